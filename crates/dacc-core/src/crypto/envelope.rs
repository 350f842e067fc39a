//! AES-256-GCM authenticated envelope encryption.
//!
//! An envelope is `salt ‖ nonce ‖ ciphertext+tag`: a fresh 16-byte salt and
//! 12-byte nonce are drawn from the OS CSPRNG on every seal, the salt feeds
//! the password-to-key derivation and the nonce feeds the AEAD cipher. The
//! 128-bit authentication tag is appended to the ciphertext; no associated
//! data is used.

use aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::crypto::kdf::{default_backend, KeyDerivation};
use crate::error::{DaccError, Result};

/// Salt length in bytes, fed to the key derivation.
pub const SALT_LENGTH: usize = 16;

/// Nonce (IV) length in bytes, fed to the AEAD cipher.
pub const NONCE_LENGTH: usize = 12;

/// Minimum combined envelope length: salt plus nonce.
pub const MIN_ENVELOPE_LENGTH: usize = SALT_LENGTH + NONCE_LENGTH;

/// The three parts of a sealed envelope, uncombined.
///
/// Callers concatenate with [`SealedParts::combined`] as needed.
#[derive(Debug, Clone)]
pub struct SealedParts {
    /// Random salt fed to the key derivation. Not secret.
    pub salt: [u8; SALT_LENGTH],
    /// Random nonce fed to the cipher. Not secret, never reused with the
    /// same derived key.
    pub nonce: [u8; NONCE_LENGTH],
    /// Ciphertext with the 128-bit authentication tag appended.
    pub ciphertext: Vec<u8>,
}

impl SealedParts {
    /// Concatenate as `salt ‖ nonce ‖ ciphertext+tag`.
    pub fn combined(&self) -> Vec<u8> {
        let mut combined =
            Vec::with_capacity(SALT_LENGTH + NONCE_LENGTH + self.ciphertext.len());
        combined.extend_from_slice(&self.salt);
        combined.extend_from_slice(&self.nonce);
        combined.extend_from_slice(&self.ciphertext);
        combined
    }

    /// Split combined envelope bytes back into parts.
    ///
    /// # Errors
    ///
    /// Returns [`DaccError::Format`] if fewer than 28 bytes are given.
    pub fn split(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_LENGTH {
            return Err(DaccError::Format(format!(
                "envelope payload must be at least {} bytes (got {})",
                MIN_ENVELOPE_LENGTH,
                bytes.len()
            )));
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&bytes[..SALT_LENGTH]);
        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes[SALT_LENGTH..MIN_ENVELOPE_LENGTH]);

        Ok(Self {
            salt,
            nonce,
            ciphertext: bytes[MIN_ENVELOPE_LENGTH..].to_vec(),
        })
    }
}

/// Password-based authenticated encryption of small secrets.
///
/// Holds a reference to the key-derivation backend; [`EnvelopeCipher::default`]
/// uses the process-wide Argon2id backend, tests inject a faster one.
///
/// Every seal/open call is independent and free of shared mutable state, so a
/// single cipher value is safe to use from arbitrarily many threads. Calls are
/// deliberately slow (memory-hard derivation); keep them off latency-sensitive
/// paths.
#[derive(Clone, Copy)]
pub struct EnvelopeCipher<'k> {
    kdf: &'k dyn KeyDerivation,
}

impl Default for EnvelopeCipher<'static> {
    fn default() -> Self {
        Self {
            kdf: default_backend(),
        }
    }
}

impl EnvelopeCipher<'static> {
    /// Create a cipher backed by the process-wide Argon2id backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'k> EnvelopeCipher<'k> {
    /// Create a cipher with an injected key-derivation backend.
    pub fn with_kdf(kdf: &'k dyn KeyDerivation) -> Self {
        Self { kdf }
    }

    /// Seal plaintext under a password.
    ///
    /// Generates a fresh salt and nonce, derives a 256-bit key from
    /// (password, salt), and authenticate-encrypts the plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`DaccError::Crypto`] if random-byte generation or key
    /// derivation fails.
    pub fn seal(&self, plaintext: &[u8], password: &str) -> Result<SealedParts> {
        let salt = random_bytes::<SALT_LENGTH>()?;
        let nonce = random_bytes::<NONCE_LENGTH>()?;

        let key = self.kdf.derive_key(password.as_bytes(), &salt)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| DaccError::Crypto(format!("Invalid AES key: {}", e)))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| DaccError::Crypto("Encryption failed".to_string()))?;

        Ok(SealedParts {
            salt,
            nonce,
            ciphertext,
        })
    }

    /// Open a sealed envelope with a password.
    ///
    /// Re-derives the key deterministically from (password, salt) with the
    /// same cost parameters, then authenticate-decrypts.
    ///
    /// # Errors
    ///
    /// Returns the single generic [`DaccError::Decryption`] on any
    /// verification failure; wrong password and corrupted ciphertext are
    /// indistinguishable.
    pub fn open(
        &self,
        salt: &[u8; SALT_LENGTH],
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        password: &str,
    ) -> Result<Vec<u8>> {
        let key = self.kdf.derive_key(password.as_bytes(), salt)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| DaccError::Crypto(format!("Invalid AES key: {}", e)))?;

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| DaccError::Decryption)
    }
}

/// Fill a fixed-size array from the OS CSPRNG.
fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| DaccError::Crypto(format!("RNG failure: {}", e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::Argon2Kdf;

    fn fast_cipher() -> EnvelopeCipher<'static> {
        static KDF: Argon2Kdf = Argon2Kdf::new(8, 1, 1);
        EnvelopeCipher::with_kdf(&KDF)
    }

    #[test]
    fn test_seal_open_round_trip() {
        let cipher = fast_cipher();
        let plaintext = [7u8; 32];

        let parts = cipher.seal(&plaintext, "test-password-123").unwrap();
        let opened = cipher
            .open(&parts.salt, &parts.nonce, &parts.ciphertext, "test-password-123")
            .unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_fresh_salt_and_nonce_every_seal() {
        let cipher = fast_cipher();
        let plaintext = [7u8; 32];

        let a = cipher.seal(&plaintext, "test-password-123").unwrap();
        let b = cipher.seal(&plaintext, "test-password-123").unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_wrong_password_fails() {
        let cipher = fast_cipher();
        let parts = cipher.seal(&[7u8; 32], "correct-password").unwrap();

        let result = cipher.open(&parts.salt, &parts.nonce, &parts.ciphertext, "wrong-password");
        assert!(matches!(result, Err(DaccError::Decryption)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = fast_cipher();
        let mut parts = cipher.seal(&[7u8; 32], "test-password-123").unwrap();
        parts.ciphertext[0] ^= 0x01;

        let result = cipher.open(&parts.salt, &parts.nonce, &parts.ciphertext, "test-password-123");
        assert!(matches!(result, Err(DaccError::Decryption)));
    }

    #[test]
    fn test_ciphertext_includes_tag() {
        let cipher = fast_cipher();
        let parts = cipher.seal(&[7u8; 32], "test-password-123").unwrap();
        // 32 bytes of plaintext plus the 16-byte GCM tag.
        assert_eq!(parts.ciphertext.len(), 48);
    }

    #[test]
    fn test_combined_split_round_trip() {
        let cipher = fast_cipher();
        let parts = cipher.seal(&[7u8; 32], "test-password-123").unwrap();

        let combined = parts.combined();
        let split = SealedParts::split(&combined).unwrap();

        assert_eq!(split.salt, parts.salt);
        assert_eq!(split.nonce, parts.nonce);
        assert_eq!(split.ciphertext, parts.ciphertext);
    }

    #[test]
    fn test_split_rejects_short_payload() {
        let result = SealedParts::split(&[0u8; 27]);
        assert!(matches!(result, Err(DaccError::Format(_))));
    }
}
