//! Error types for authentication and access control.

use keyforge_types::{OperatorId, Role};
use thiserror::Error;

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised while authenticating or authorizing an operator.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer credential was presented.
    #[error("missing credential")]
    MissingCredential,

    /// Token is not `payload.signature` or a part is not valid base64url.
    #[error("invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Ed25519 signature verification failed.
    #[error("token signature invalid")]
    InvalidSignature,

    /// Signed payload is not a valid claims object.
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Token expiry has elapsed.
    #[error("token expired at {0}")]
    TokenExpired(i64),

    /// Token names an operator the credential store does not hold.
    #[error("unknown operator: {0}")]
    UnknownOperator(OperatorId),

    /// Username unknown or password mismatch. The two are not distinguished.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Maintenance is active and the operator is not exempt.
    #[error("service unavailable: maintenance in progress")]
    ServiceUnavailable,

    /// Role is outside the operation's allowed set.
    #[error("role {role} may not {operation}")]
    Forbidden { role: Role, operation: String },

    /// Username already registered.
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing key material is unusable.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Returns true for failures that mean "the caller is not who they claim".
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::InvalidTokenFormat(_)
                | Self::InvalidSignature
                | Self::InvalidClaims(_)
                | Self::TokenExpired(_)
                | Self::UnknownOperator(_)
                | Self::InvalidCredentials
        )
    }
}
