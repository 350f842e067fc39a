//! Password-to-key derivation using Argon2id.
//!
//! This module derives envelope keys from passwords using the Argon2id
//! algorithm, which is memory-hard and resistant to GPU-based attacks.
//!
//! The production backend is a process-wide, lazily-initialized resource
//! reached through [`default_backend`]. Components take a
//! [`KeyDerivation`] reference instead of calling Argon2 directly, so tests
//! can substitute a deterministic, fast backend.

use argon2::Argon2;
use once_cell::sync::Lazy;
use zeroize::ZeroizeOnDrop;

use crate::error::{DaccError, Result};

/// Argon2id cost parameters: the libsodium `MODERATE` preset the envelope
/// format is defined against.
///
/// - Memory: 256 MiB
/// - Iterations: 3
/// - Parallelism: 1 (single-threaded)
///
/// These are shared by seal and open. Changing them silently breaks every
/// previously sealed envelope: the envelope format carries no cost-parameter
/// version tag.
pub const ARGON2_MEMORY_KIB: u32 = 256 * 1024;
pub const ARGON2_ITERATIONS: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

/// Length of a derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Minimum salt length accepted by the backend.
const MIN_SALT_LENGTH: usize = 16;

/// A symmetric key derived from a password.
///
/// This type ensures that key material is securely zeroized from memory
/// when dropped, reducing the window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The raw key bytes (zeroized on drop)
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Create a new DerivedKey from raw bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// A password-to-key derivation backend.
///
/// Implementations must be deterministic: the same password and salt always
/// produce the same key.
pub trait KeyDerivation: Send + Sync {
    /// Derive a 256-bit key from a password and salt.
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey>;
}

/// The Argon2id production backend.
///
/// [`Argon2Kdf::default`] uses the fixed moderate cost parameters; the
/// explicit constructor exists so benchmarks and tests can tune costs, never
/// so that production envelopes are sealed with anything but the defaults.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Kdf {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for Argon2Kdf {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl Argon2Kdf {
    /// Create a backend with explicit cost parameters.
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

impl KeyDerivation for Argon2Kdf {
    /// Derive an envelope key from a password using Argon2id.
    ///
    /// # Security
    ///
    /// - Same password + salt always produces the same key (deterministic)
    /// - Different salt produces a different key (salt is stored with the envelope)
    /// - Memory-hard: resistant to GPU attacks, deliberately slow
    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<DerivedKey> {
        if salt.len() < MIN_SALT_LENGTH {
            return Err(DaccError::Crypto(format!(
                "Salt must be at least {} bytes",
                MIN_SALT_LENGTH
            )));
        }

        let params = argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| DaccError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let mut key_bytes = [0u8; KEY_LENGTH];
        argon2
            .hash_password_into(password, salt, &mut key_bytes)
            .map_err(|e| DaccError::Crypto(format!("Key derivation failed: {}", e)))?;

        Ok(DerivedKey::from_bytes(key_bytes))
    }
}

static DEFAULT_BACKEND: Lazy<Argon2Kdf> = Lazy::new(Argon2Kdf::default);

/// The process-wide Argon2id backend with the fixed moderate parameters.
///
/// Initialized lazily on first use; there is no teardown.
pub fn default_backend() -> &'static dyn KeyDerivation {
    &*DEFAULT_BACKEND
}
