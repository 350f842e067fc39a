//! Error types for dacc core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Decryption failures are deliberately undifferentiated: callers (and
//! attackers) cannot tell a wrong password apart from corrupted ciphertext.

use thiserror::Error;

/// Result type alias for dacc operations.
pub type Result<T> = std::result::Result<T, DaccError>;

/// Core error type for dacc operations.
#[derive(Debug, Error)]
pub enum DaccError {
    /// Password length outside the configured bounds.
    ///
    /// Checked before any cryptographic work is performed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed envelope string: missing prefix, empty payload, invalid
    /// base-58 character, or payload too short.
    ///
    /// Checked before any cryptographic work is performed.
    #[error("Format error: {0}")]
    Format(String),

    /// Wrong password or corrupted ciphertext.
    ///
    /// A single generic error for every authenticated-decryption failure, so
    /// the error channel cannot be used as an oracle.
    #[error("Decryption failed: invalid password or corrupted envelope")]
    Decryption,

    /// Cryptographic backend failure (key derivation setup, RNG).
    ///
    /// Messages never contain password or key material.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
