//! Prefixed base-58 string codec for sealed envelopes.
//!
//! An encoded envelope is `daccPublickey_[<public id>_]<base58 digits>`: the
//! fixed prefix, an optional non-secret public identifier (for example a
//! derived address, to allow reverse lookup without decryption), and the
//! envelope bytes rendered in a 58-symbol alphabet. No cryptography happens
//! here; this module is pure encoding.
//!
//! The alphabet excludes the ambiguous glyphs `0`, `O`, `I` and `l`. Leading
//! zero bytes are preserved as leading zero digits (`1`), so encoding is
//! lossless for arbitrary byte strings.

use num_bigint::BigUint;

use crate::error::{DaccError, Result};

/// Fixed literal prefix carried by every encoded envelope.
pub const ENVELOPE_PREFIX: &str = "daccPublickey_";

/// 58-symbol alphabet (digits and letters, excluding `0`, `O`, `I`, `l`).
const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A decoded envelope string: the raw bytes plus the public identifier that
/// was embedded at encode time, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Public identifier embedded after the prefix, if one was given.
    pub public_id: Option<String>,
    /// The decoded payload bytes.
    pub bytes: Vec<u8>,
}

/// Encode bytes as a prefixed base-58 string.
///
/// If `public_id` is given it is inserted between the prefix and the digits,
/// followed by an underscore separator. Identifiers may themselves contain
/// underscores; [`decode`] recovers them unchanged because the base-58
/// payload never contains one.
///
/// # Examples
///
/// ```
/// use dacc_core::codec::{encode, ENVELOPE_PREFIX};
///
/// let encoded = encode(&[0x2a; 4], Some("0xABCDEF"));
/// assert!(encoded.starts_with(ENVELOPE_PREFIX));
/// assert!(encoded.contains("0xABCDEF_"));
/// ```
pub fn encode(bytes: &[u8], public_id: Option<&str>) -> String {
    let leading_zeros = bytes.iter().take_while(|b| **b == 0).count();

    let mut digits = String::new();
    for _ in 0..leading_zeros {
        digits.push(BASE58_ALPHABET[0] as char);
    }
    let rest = &bytes[leading_zeros..];
    if !rest.is_empty() {
        let num = BigUint::from_bytes_be(rest);
        for digit in num.to_radix_be(58) {
            digits.push(BASE58_ALPHABET[digit as usize] as char);
        }
    }

    match public_id {
        Some(id) => format!("{ENVELOPE_PREFIX}{id}_{digits}"),
        None => format!("{ENVELOPE_PREFIX}{digits}"),
    }
}

/// Decode a prefixed base-58 string back into bytes.
///
/// The remainder after the prefix is split on the *last* underscore: everything
/// before it is the public identifier (which may itself contain underscores),
/// everything after it is the base-58 payload. Without an underscore the whole
/// remainder is the payload.
///
/// # Errors
///
/// Returns [`DaccError::Format`] if the prefix is absent, the payload is
/// empty, or the payload contains a character outside the alphabet.
pub fn decode(encoded: &str) -> Result<Decoded> {
    let rest = encoded
        .strip_prefix(ENVELOPE_PREFIX)
        .ok_or_else(|| DaccError::Format("invalid prefix".to_string()))?;

    let (public_id, payload) = match rest.rsplit_once('_') {
        Some((id, payload)) if !id.is_empty() => (Some(id.to_string()), payload),
        Some((_, payload)) => (None, payload),
        None => (None, rest),
    };

    if payload.is_empty() {
        return Err(DaccError::Format("empty payload".to_string()));
    }

    let mut digits = Vec::with_capacity(payload.len());
    for c in payload.chars() {
        let index = BASE58_ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or_else(|| DaccError::Format(format!("invalid base-58 character: '{c}'")))?;
        digits.push(index as u8);
    }

    let leading_zeros = digits.iter().take_while(|d| **d == 0).count();
    let mut bytes = vec![0u8; leading_zeros];
    let rest_digits = &digits[leading_zeros..];
    if !rest_digits.is_empty() {
        let num = BigUint::from_radix_be(rest_digits, 58)
            .ok_or_else(|| DaccError::Format("invalid base-58 payload".to_string()))?;
        bytes.extend_from_slice(&num.to_bytes_be());
    }

    Ok(Decoded { public_id, bytes })
}
