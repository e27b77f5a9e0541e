//! Session token signing and verification.
//!
//! Tokens use the format: `base64url(claims).base64url(signature)`
//!
//! The claims are a JSON object containing:
//! - `sub`: operator ID
//! - `iat`: issued-at timestamp (seconds since epoch)
//! - `exp`: expiry timestamp (seconds since epoch)
//!
//! The Ed25519 signature covers `claims_b64.as_bytes()` (the encoded claims
//! string, not the decoded JSON).

use crate::error::{AuthError, AuthResult};
use base64::{Engine, engine::general_purpose::STANDARD, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keyforge_types::OperatorId;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Size of an Ed25519 seed in bytes.
pub const SEED_SIZE: usize = 32;

/// Claims carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Operator the session belongs to.
    pub sub: OperatorId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiry timestamp (seconds since epoch).
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for `sub` issued at `now`, valid for `ttl_secs`.
    #[must_use]
    pub fn new(sub: OperatorId, now: i64, ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            sub,
            iat: now,
            exp: now.saturating_add(ttl),
        }
    }

    /// Returns true if the session has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Issues and verifies session tokens.
pub trait TokenService: Send + Sync {
    /// Signs the claims into an opaque token string.
    fn issue(&self, claims: &SessionClaims) -> AuthResult<String>;

    /// Verifies signature and expiry, returning the embedded claims.
    fn verify(&self, token: &str) -> AuthResult<SessionClaims>;
}

/// Ed25519 implementation of [`TokenService`].
pub struct Ed25519Tokens {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519Tokens {
    /// Creates a token service from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Creates a token service from a standard-base64 encoded seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not base64 or not exactly 32 bytes.
    pub fn from_base64_seed(encoded: &str) -> AuthResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthError::InvalidSigningKey(format!("invalid base64: {e}")))?;
        let seed: [u8; SEED_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            AuthError::InvalidSigningKey(format!("expected {SEED_SIZE} bytes, got {}", bytes.len()))
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// Creates a token service with a fresh random key. Tokens it issues do
    /// not outlive the process.
    #[must_use]
    pub fn generate() -> Self {
        let mut seed = [0u8; SEED_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        Self::from_seed(&seed)
    }

    /// Returns the public half of the signing key.
    #[must_use]
    pub fn verifying_key(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }
}

impl std::fmt::Debug for Ed25519Tokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Tokens")
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService for Ed25519Tokens {
    fn issue(&self, claims: &SessionClaims) -> AuthResult<String> {
        let payload = serde_json::to_vec(claims)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.signing_key.sign(payload_b64.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(signature.to_bytes());
        Ok(format!("{payload_b64}.{sig_b64}"))
    }

    fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        let token = token.trim();

        let Some((payload_b64, signature_b64)) = token.split_once('.') else {
            return Err(AuthError::InvalidTokenFormat(
                "token must have exactly two parts separated by a dot".to_string(),
            ));
        };
        if signature_b64.contains('.') {
            return Err(AuthError::InvalidTokenFormat(
                "token must have exactly two parts separated by a dot".to_string(),
            ));
        }

        let sig_bytes = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| AuthError::InvalidTokenFormat(format!("invalid signature base64: {e}")))?;
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|_| AuthError::InvalidTokenFormat("invalid signature length".to_string()))?;

        self.verifying_key
            .verify(payload_b64.as_bytes(), &signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| AuthError::InvalidTokenFormat(format!("invalid payload base64: {e}")))?;
        let claims: SessionClaims = serde_json::from_slice(&payload_json)
            .map_err(|e| AuthError::InvalidClaims(e.to_string()))?;

        if claims.is_expired_at(chrono::Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired(claims.exp));
        }

        Ok(claims)
    }
}
