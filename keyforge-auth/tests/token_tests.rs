mod common;

use base64::{Engine, engine::general_purpose::STANDARD, engine::general_purpose::URL_SAFE_NO_PAD};
use common::{TEST_SEED, test_tokens};
use keyforge_auth::{AuthError, Ed25519Tokens, SessionClaims, TokenService};
use keyforge_types::OperatorId;

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

// ── SessionClaims ────────────────────────────────────────────────

#[test]
fn claims_expiry_window() {
    let claims = SessionClaims::new(OperatorId::new(1), 1_000, 3600);
    assert_eq!(claims.iat, 1_000);
    assert_eq!(claims.exp, 4_600);
    assert!(!claims.is_expired_at(4_599));
    assert!(claims.is_expired_at(4_600));
}

#[test]
fn claims_ttl_saturates() {
    let claims = SessionClaims::new(OperatorId::new(1), 10, u64::MAX);
    assert_eq!(claims.exp, i64::MAX);
}

// ── Issue / verify ───────────────────────────────────────────────

#[test]
fn issued_token_verifies() {
    let tokens = test_tokens();
    let claims = SessionClaims::new(OperatorId::new(7), now(), 60);
    let token = tokens.issue(&claims).unwrap();

    assert_eq!(token.split('.').count(), 2);
    assert_eq!(tokens.verify(&token).unwrap(), claims);
}

#[test]
fn same_seed_verifies_across_instances() {
    let claims = SessionClaims::new(OperatorId::new(3), now(), 60);
    let token = Ed25519Tokens::from_seed(&TEST_SEED).issue(&claims).unwrap();
    let other = Ed25519Tokens::from_seed(&TEST_SEED);
    assert_eq!(other.verify(&token).unwrap().sub, OperatorId::new(3));
}

#[test]
fn verify_trims_whitespace() {
    let tokens = test_tokens();
    let token = tokens.issue(&SessionClaims::new(OperatorId::new(1), now(), 60)).unwrap();
    assert!(tokens.verify(&format!("  {token}\n")).is_ok());
}

#[test]
fn expired_token_rejected() {
    let tokens = test_tokens();
    let claims = SessionClaims {
        sub: OperatorId::new(1),
        iat: now() - 7200,
        exp: now() - 3600,
    };
    let token = tokens.issue(&claims).unwrap();
    assert!(matches!(tokens.verify(&token), Err(AuthError::TokenExpired(_))));
}

#[test]
fn token_from_other_key_rejected() {
    let forger = Ed25519Tokens::generate();
    let token = forger.issue(&SessionClaims::new(OperatorId::new(1), now(), 60)).unwrap();
    assert!(matches!(test_tokens().verify(&token), Err(AuthError::InvalidSignature)));
}

#[test]
fn swapped_payload_rejected() {
    let tokens = test_tokens();
    let token = tokens.issue(&SessionClaims::new(OperatorId::new(2), now(), 60)).unwrap();
    let (_, signature) = token.split_once('.').unwrap();

    let escalated = SessionClaims::new(OperatorId::new(1), now(), 60);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&escalated).unwrap());
    let forged = format!("{payload}.{signature}");

    assert!(matches!(tokens.verify(&forged), Err(AuthError::InvalidSignature)));
}

#[test]
fn malformed_tokens_rejected() {
    let tokens = test_tokens();
    for bad in ["", "nodot", "a.b.c", "!!!.!!!", "abc.AAAA"] {
        let err = tokens.verify(bad).unwrap_err();
        assert!(err.is_unauthenticated(), "{bad:?} gave {err:?}");
    }
}

#[test]
fn signed_garbage_payload_rejected() {
    // Signed correctly, but the payload is not a claims object.
    let tokens = test_tokens();
    let signing = ed25519_dalek::SigningKey::from_bytes(&TEST_SEED);
    let payload_b64 = URL_SAFE_NO_PAD.encode(br#"{"sub":1}"#);
    let signature = ed25519_dalek::Signer::sign(&signing, payload_b64.as_bytes());
    let token = format!("{payload_b64}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes()));

    assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidClaims(_))));
}

// ── Key material ─────────────────────────────────────────────────

#[test]
fn base64_seed_roundtrip() {
    let encoded = STANDARD.encode(TEST_SEED);
    let tokens = Ed25519Tokens::from_base64_seed(&encoded).unwrap();
    assert_eq!(tokens.verifying_key(), test_tokens().verifying_key());
}

#[test]
fn base64_seed_wrong_length_rejected() {
    let encoded = STANDARD.encode([0u8; 16]);
    let err = Ed25519Tokens::from_base64_seed(&encoded).unwrap_err();
    assert!(matches!(err, AuthError::InvalidSigningKey(_)));
    assert!(format!("{err}").contains("32"));
}

#[test]
fn debug_redacts_signing_key() {
    let debug = format!("{:?}", test_tokens());
    assert!(debug.contains("REDACTED"));
}
