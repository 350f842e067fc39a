//! # dacc-core
//!
//! Envelope encryption for safeguarding a raw private key behind a user
//! password, plus a derived, time-boxed session-credential mechanism that
//! lets a server-side signing secret temporarily stand in for the password.
//!
//! Three pieces compose:
//! - [`codec`]: the `daccPublickey_…` prefixed base-58 string format, with an
//!   optional public identifier embedded alongside the ciphertext
//! - [`crypto`]: Argon2id key derivation and AES-256-GCM envelope
//!   seal/open
//! - [`vault`]: `create_sealed(secret, password) → encoded string` and
//!   `open_sealed(encoded string, password) → secret`
//! - [`token`]: signed, expiring HS256 session tokens carrying the secret
//!   re-sealed under the application's signing secret
//!
//! Storage of envelopes, transaction building, and any CLI/HTTP surface live
//! outside this crate; the only values meant to cross a process or storage
//! boundary are the encoded envelope and session token strings.
//!
//! ## Example
//!
//! ```
//! use dacc_core::{SealOptions, Secret, SecretVault};
//! # use dacc_core::crypto::Argon2Kdf;
//!
//! # let kdf = Argon2Kdf::new(8, 1, 1);
//! # let vault = SecretVault::with_kdf(&kdf);
//! let secret = Secret::from_bytes([0x42; 32]);
//! let envelope = vault
//!     .create_sealed(&secret, "CorrectHorseBatteryStaple!", &SealOptions::default())
//!     .unwrap();
//! let opened = vault.open_sealed(&envelope, "CorrectHorseBatteryStaple!").unwrap();
//! assert_eq!(opened.as_bytes(), secret.as_bytes());
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod signer;
pub mod token;
pub mod vault;

pub use codec::ENVELOPE_PREFIX;
pub use crypto::{Argon2Kdf, EnvelopeCipher, KeyDerivation, SealedParts};
pub use error::{DaccError, Result};
pub use signer::{ResolvedSigner, SignerSource};
pub use token::{SessionTokens, SessionWallet, DEFAULT_TOKEN_TTL_SECS};
pub use vault::{
    SealOptions, Secret, SecretVault, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, SECRET_LENGTH,
};
