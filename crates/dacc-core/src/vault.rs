//! The secret vault: seal a fixed-size secret under a password into a single
//! self-describing encoded string, and open it back.
//!
//! This is the reusable unit the session-token layer builds on. It composes
//! the codec and the envelope cipher and performs no I/O; persisting the
//! encoded string (ledger, key-value store, ...) is the caller's concern.

use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::codec;
use crate::crypto::envelope::{EnvelopeCipher, SealedParts};
use crate::crypto::kdf::KeyDerivation;
use crate::error::{DaccError, Result};

/// Length of a secret in bytes (one asymmetric private key).
pub const SECRET_LENGTH: usize = 32;

/// Default minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Default maximum password length in characters.
pub const MAX_PASSWORD_LENGTH: usize = 120;

/// A fixed-size raw secret (an asymmetric private key).
///
/// Never persisted in clear form; exists only transiently on the call stack
/// of seal/open/issue/verify. Zeroized from memory on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Secret {
    bytes: [u8; SECRET_LENGTH],
}

impl Secret {
    /// Create a secret from raw bytes.
    pub fn from_bytes(bytes: [u8; SECRET_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Create a secret from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`DaccError::Validation`] if the slice is not exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; SECRET_LENGTH] = slice.try_into().map_err(|_| {
            DaccError::Validation(format!(
                "Secret must be exactly {} bytes (got {})",
                SECRET_LENGTH,
                slice.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Get a reference to the raw secret bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate signing or
    /// re-encryption operations.
    pub fn as_bytes(&self) -> &[u8; SECRET_LENGTH] {
        &self.bytes
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Options for sealing a secret.
#[derive(Debug, Clone)]
pub struct SealOptions {
    /// Minimum password length in characters (inclusive).
    pub min_password: usize,
    /// Maximum password length in characters (inclusive).
    pub max_password: usize,
    /// Optional public identifier embedded in the encoded envelope for later
    /// lookups. Not secret, not authenticated.
    pub public_id: Option<String>,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            min_password: MIN_PASSWORD_LENGTH,
            max_password: MAX_PASSWORD_LENGTH,
            public_id: None,
        }
    }
}

impl SealOptions {
    /// Default bounds with a public identifier embedded.
    pub fn with_public_id(public_id: impl Into<String>) -> Self {
        Self {
            public_id: Some(public_id.into()),
            ..Self::default()
        }
    }
}

/// Validate password length against inclusive bounds.
///
/// Length is counted in characters, not bytes. Runs before any cryptographic
/// work.
///
/// # Errors
///
/// Returns [`DaccError::Validation`] with the violated bound.
pub fn validate_password(password: &str, min: usize, max: usize) -> Result<()> {
    let length = password.chars().count();
    if length < min {
        return Err(DaccError::Validation(format!(
            "Password must be at least {} characters",
            min
        )));
    }
    if length > max {
        return Err(DaccError::Validation(format!(
            "Password must be no more than {} characters",
            max
        )));
    }
    Ok(())
}

/// Seals secrets under passwords and opens them back.
///
/// Pure computation, no shared mutable state: one vault value is safe to use
/// from arbitrarily many concurrent callers.
#[derive(Clone, Copy)]
pub struct SecretVault<'k> {
    cipher: EnvelopeCipher<'k>,
}

impl Default for SecretVault<'static> {
    fn default() -> Self {
        Self {
            cipher: EnvelopeCipher::new(),
        }
    }
}

impl SecretVault<'static> {
    /// Create a vault backed by the process-wide Argon2id backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'k> SecretVault<'k> {
    /// Create a vault with an injected key-derivation backend.
    pub fn with_kdf(kdf: &'k dyn KeyDerivation) -> Self {
        Self {
            cipher: EnvelopeCipher::with_kdf(kdf),
        }
    }

    /// The underlying envelope cipher.
    pub(crate) fn cipher(&self) -> EnvelopeCipher<'k> {
        self.cipher
    }

    /// Seal a secret under a password into an encoded envelope string.
    ///
    /// Validates the password length bounds, seals the secret with a fresh
    /// salt and nonce, and encodes `salt ‖ nonce ‖ ciphertext+tag` with the
    /// optional public identifier embedded.
    ///
    /// # Errors
    ///
    /// - [`DaccError::Validation`] if the password length is out of bounds
    /// - [`DaccError::Crypto`] if the RNG or key derivation fails
    pub fn create_sealed(
        &self,
        secret: &Secret,
        password: &str,
        options: &SealOptions,
    ) -> Result<String> {
        validate_password(password, options.min_password, options.max_password)?;

        let parts = self.cipher.seal(secret.as_bytes(), password)?;
        Ok(codec::encode(&parts.combined(), options.public_id.as_deref()))
    }

    /// Open an encoded envelope with a password, recovering the secret.
    ///
    /// # Errors
    ///
    /// - [`DaccError::Format`] if the string is structurally invalid (bad
    ///   prefix, bad alphabet character, payload shorter than 28 bytes) —
    ///   detected before any cryptographic work
    /// - [`DaccError::Decryption`] for every cryptographic failure: wrong
    ///   password, corrupted ciphertext, or a plaintext of the wrong size.
    ///   Which of those happened is deliberately not revealed.
    pub fn open_sealed(&self, envelope: &str, password: &str) -> Result<Secret> {
        let decoded = codec::decode(envelope)?;
        let parts = SealedParts::split(&decoded.bytes)?;

        let plaintext = Zeroizing::new(self.cipher.open(
            &parts.salt,
            &parts.nonce,
            &parts.ciphertext,
            password,
        )?);

        Secret::try_from_slice(&plaintext).map_err(|_| DaccError::Decryption)
    }
}
