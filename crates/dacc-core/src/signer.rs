//! Signer-source resolution.
//!
//! Operations that need a signing capability accept it in one of three
//! shapes: a raw key, a handle to an externally managed signer, or a sealed
//! envelope plus the password to open it. [`SignerSource::resolve`] is the
//! single point where the three collapse into a concrete capability;
//! downstream code branches on [`ResolvedSigner`] only and never re-inspects
//! the original shape.

use crate::error::Result;
use crate::vault::{Secret, SecretVault};

/// Where a signing key comes from.
pub enum SignerSource {
    /// A raw 32-byte key supplied directly by the caller.
    RawKey(Secret),
    /// A handle to an externally managed signer (for example a connected
    /// account); the key never enters this process.
    ExternalHandle(String),
    /// A sealed envelope plus the password to open it.
    EncryptedCredential {
        /// The encoded envelope string.
        envelope: String,
        /// The password it was sealed under.
        password: String,
    },
}

/// A resolved signing capability.
pub enum ResolvedSigner {
    /// An in-process key, ready to sign with.
    Key(Secret),
    /// An external signer handle; signing is delegated.
    External(String),
}

impl SignerSource {
    /// Resolve into a concrete signing capability.
    ///
    /// Encrypted credentials are opened through the vault; the other two
    /// variants pass through unchanged.
    ///
    /// # Errors
    ///
    /// Propagates the vault's errors for the encrypted-credential variant:
    /// [`crate::DaccError::Format`] for a malformed envelope,
    /// [`crate::DaccError::Decryption`] for a wrong password or corrupted
    /// ciphertext.
    pub fn resolve(self, vault: &SecretVault<'_>) -> Result<ResolvedSigner> {
        match self {
            Self::RawKey(secret) => Ok(ResolvedSigner::Key(secret)),
            Self::ExternalHandle(handle) => Ok(ResolvedSigner::External(handle)),
            Self::EncryptedCredential { envelope, password } => {
                let secret = vault.open_sealed(&envelope, &password)?;
                Ok(ResolvedSigner::Key(secret))
            }
        }
    }
}
