//! Signed, expiring session tokens carrying a re-encrypted secret.
//!
//! A token lets a server-side signing secret temporarily stand in for the
//! user's password: `issue` opens the envelope with the password, re-seals
//! the secret under the signing secret (fresh salt and nonce, same envelope
//! cipher — exactly one authenticated-encryption code path to audit), and
//! packages the result as an HS256 JWT. `verify` is a total function: every
//! failure mode yields `None`, never an error, because verification is
//! expected to fail routinely (every expired session).
//!
//! Tokens are stateless bearer credentials. There is no revocation list;
//! expiry is a data check (`exp < now`), not a scheduled cancellation, so
//! verification of a still-valid token is idempotent.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::codec;
use crate::crypto::kdf::KeyDerivation;
use crate::error::{DaccError, Result};
use crate::vault::{Secret, SecretVault};

type HmacSha256 = Hmac<Sha256>;

/// Default token time-to-live in seconds (1 hour).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// JWT header, fixed: `{"alg":"HS256","typ":"JWT"}`.
#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: "HS256",
            typ: "JWT",
        }
    }
}

/// Token claims: the public identifier, the secret re-sealed under the
/// signing secret, and the issue/expiry timestamps in unix seconds.
#[derive(Serialize, Deserialize)]
struct Claims {
    address: Option<String>,
    #[serde(rename = "encryptedPk")]
    encrypted_pk: String,
    iat: i64,
    exp: i64,
}

/// A verified session: the public identifier from the claims and the
/// recovered secret.
#[derive(Debug)]
pub struct SessionWallet {
    /// Public identifier embedded in the original envelope, if any.
    pub address: Option<String>,
    /// The recovered secret.
    pub secret: Secret,
}

/// Issues and verifies session tokens.
///
/// Like the vault, this is pure computation with no shared mutable state;
/// one value serves arbitrarily many concurrent callers.
#[derive(Clone, Copy)]
pub struct SessionTokens<'k> {
    vault: SecretVault<'k>,
}

impl Default for SessionTokens<'static> {
    fn default() -> Self {
        Self {
            vault: SecretVault::new(),
        }
    }
}

impl SessionTokens<'static> {
    /// Create an issuer/verifier backed by the process-wide Argon2id backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'k> SessionTokens<'k> {
    /// Create an issuer/verifier with an injected key-derivation backend.
    pub fn with_kdf(kdf: &'k dyn KeyDerivation) -> Self {
        Self {
            vault: SecretVault::with_kdf(kdf),
        }
    }

    /// Issue a session token with the default one-hour time-to-live.
    ///
    /// See [`SessionTokens::issue_with_ttl`].
    pub fn issue(&self, envelope: &str, password: &str, signing_secret: &str) -> Result<String> {
        self.issue_with_ttl(envelope, password, signing_secret, DEFAULT_TOKEN_TTL_SECS)
    }

    /// Issue a session token.
    ///
    /// Opens `envelope` with the user's password, re-seals the secret under
    /// `signing_secret` acting as the password (no identifier embedded in the
    /// inner envelope), and returns a signed JWT whose claims carry the
    /// re-sealed envelope, the original envelope's public identifier, and
    /// `iat`/`exp` timestamps.
    ///
    /// # Errors
    ///
    /// Returns the single generic [`DaccError::Decryption`] when the envelope
    /// cannot be opened, whether the password is wrong or the envelope is
    /// malformed or corrupted.
    pub fn issue_with_ttl(
        &self,
        envelope: &str,
        password: &str,
        signing_secret: &str,
        ttl_seconds: u64,
    ) -> Result<String> {
        let address = codec::decode(envelope)
            .map_err(|_| DaccError::Decryption)?
            .public_id;
        let secret = self
            .vault
            .open_sealed(envelope, password)
            .map_err(|_| DaccError::Decryption)?;

        let parts = self.vault.cipher().seal(secret.as_bytes(), signing_secret)?;
        let encrypted_pk = codec::encode(&parts.combined(), None);

        let iat = Utc::now().timestamp();
        let claims = Claims {
            address,
            encrypted_pk,
            iat,
            exp: iat + ttl_seconds as i64,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Header::hs256())?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = URL_SAFE_NO_PAD.encode(sign(signing_input.as_bytes(), signing_secret)?);

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a session token and recover the secret.
    ///
    /// Fails closed with `None` when:
    /// - the token does not have exactly three non-empty segments
    /// - the signature over the first two segments does not match
    ///   (constant-time comparison)
    /// - the claims cannot be parsed
    /// - `exp` is in the past
    /// - the inner envelope does not open under `signing_secret`
    ///
    /// No decryption is attempted before the signature and expiry checks
    /// pass. Never returns an error and never panics on untrusted input.
    pub fn verify(&self, token: &str, signing_secret: &str) -> Option<SessionWallet> {
        let mut segments = token.split('.');
        let header_b64 = segments.next()?;
        let claims_b64 = segments.next()?;
        let signature_b64 = segments.next()?;
        if segments.next().is_some()
            || header_b64.is_empty()
            || claims_b64.is_empty()
            || signature_b64.is_empty()
        {
            return None;
        }

        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).ok()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let claims: Claims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims_b64).ok()?).ok()?;
        if claims.exp < Utc::now().timestamp() {
            return None;
        }

        let secret = self
            .vault
            .open_sealed(&claims.encrypted_pk, signing_secret)
            .ok()?;

        Some(SessionWallet {
            address: claims.address,
            secret,
        })
    }
}

/// HMAC-SHA-256 over `data`, keyed by the UTF-8 bytes of the signing secret.
fn sign(data: &[u8], signing_secret: &str) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| DaccError::Crypto(format!("Invalid HMAC key: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
