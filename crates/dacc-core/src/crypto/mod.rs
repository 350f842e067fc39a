//! Cryptographic operations for dacc.
//!
//! This module provides envelope encryption and key derivation services using
//! well-audited libraries:
//! - **AES-256-GCM**: Authenticated encryption (96-bit nonce, 128-bit tag)
//! - **Argon2id**: Memory-hard key derivation function
//!
//! ## Security Model
//!
//! - Password-based envelope encryption: fresh salt and nonce per seal
//! - Argon2id for key derivation (memory-hard, resistant to brute-force)
//! - Sensitive data zeroized from memory on drop
//! - No plaintext passwords or keys stored
//! - Decryption failures are a single generic error: wrong password and
//!   corrupted ciphertext are indistinguishable to callers
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encoded envelope string
//! - Offline brute-force attacks on the password
//! - Ciphertext tampering (authentication tag)
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory while a secret is in use

pub mod envelope;
pub mod kdf;

pub use envelope::{EnvelopeCipher, SealedParts, MIN_ENVELOPE_LENGTH, NONCE_LENGTH, SALT_LENGTH};
pub use kdf::{default_backend, Argon2Kdf, DerivedKey, KeyDerivation};
