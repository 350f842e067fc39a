use std::thread;
use std::time::Duration;

use dacc_core::crypto::Argon2Kdf;
use dacc_core::{SealOptions, Secret, SecretVault, SessionTokens};

static FAST_KDF: Argon2Kdf = Argon2Kdf::new(8, 1, 1);

const PASSWORD: &str = "session-user-password";
const SIGNING_SECRET: &str = "long-random-application-signing-secret";

fn sealed_envelope(secret: &Secret) -> String {
    let vault = SecretVault::with_kdf(&FAST_KDF);
    vault
        .create_sealed(secret, PASSWORD, &SealOptions::with_public_id("0xABCDEF"))
        .expect("sealing should succeed")
}

#[test]
fn test_token_lifecycle_valid_then_expired() {
    let secret = Secret::from_bytes([0x99; 32]);
    let envelope = sealed_envelope(&secret);
    let tokens = SessionTokens::with_kdf(&FAST_KDF);

    let token = tokens
        .issue_with_ttl(&envelope, PASSWORD, SIGNING_SECRET, 1)
        .expect("issuing should succeed");

    // Immediately after issue the token is valid.
    let wallet = tokens
        .verify(&token, SIGNING_SECRET)
        .expect("fresh token should verify");
    assert_eq!(wallet.secret.as_bytes(), secret.as_bytes());
    assert_eq!(wallet.address.as_deref(), Some("0xABCDEF"));

    // Past the time-to-live the same token yields the absent result.
    thread::sleep(Duration::from_secs(2));
    assert!(tokens.verify(&token, SIGNING_SECRET).is_none());
    // Repeated verification of an expired token stays absent, no side effects.
    assert!(tokens.verify(&token, SIGNING_SECRET).is_none());
}

#[test]
fn test_signature_tampering_always_absent_never_panics() {
    let secret = Secret::from_bytes([0x31; 32]);
    let envelope = sealed_envelope(&secret);
    let tokens = SessionTokens::with_kdf(&FAST_KDF);

    let token = tokens
        .issue(&envelope, PASSWORD, SIGNING_SECRET)
        .expect("issuing should succeed");
    let signature_start = token.rfind('.').expect("token has a signature segment") + 1;

    for index in signature_start..token.len() {
        let mut tampered: Vec<char> = token.chars().collect();
        tampered[index] = if tampered[index] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();

        assert!(
            tokens.verify(&tampered, SIGNING_SECRET).is_none(),
            "tampered signature at position {index} was accepted"
        );
    }
}

#[test]
fn test_claims_tampering_rejected() {
    let secret = Secret::from_bytes([0x32; 32]);
    let envelope = sealed_envelope(&secret);
    let tokens = SessionTokens::with_kdf(&FAST_KDF);

    let token = tokens
        .issue(&envelope, PASSWORD, SIGNING_SECRET)
        .expect("issuing should succeed");
    let segments: Vec<&str> = token.split('.').collect();

    // Re-sign nothing: swap in claims from a second token, keep the first
    // signature.
    let other = tokens
        .issue(&envelope, PASSWORD, SIGNING_SECRET)
        .expect("issuing should succeed");
    let other_claims = other.split('.').nth(1).expect("token has claims");

    let spliced = format!("{}.{}.{}", segments[0], other_claims, segments[2]);
    assert!(tokens.verify(&spliced, SIGNING_SECRET).is_none());
}

#[test]
fn test_garbage_tokens_yield_absent_result() {
    let tokens = SessionTokens::with_kdf(&FAST_KDF);

    for garbage in [
        "",
        ".",
        "..",
        "...",
        "not a token at all",
        "a.b.c",
        "eyJhbGciOiJIUzI1NiJ9..sig",
        "\u{0}.\u{0}.\u{0}",
    ] {
        assert!(tokens.verify(garbage, SIGNING_SECRET).is_none());
    }
}

#[test]
fn test_default_ttl_is_one_hour_window() {
    let secret = Secret::from_bytes([0x33; 32]);
    let envelope = sealed_envelope(&secret);
    let tokens = SessionTokens::with_kdf(&FAST_KDF);

    let token = tokens
        .issue(&envelope, PASSWORD, SIGNING_SECRET)
        .expect("issuing should succeed");

    // A token issued with the default TTL verifies now and carries the
    // secret; the exact expiry instant is covered by the ttl=1 test.
    let wallet = tokens
        .verify(&token, SIGNING_SECRET)
        .expect("fresh token should verify");
    assert_eq!(wallet.secret.as_bytes(), secret.as_bytes());
}
