//! Error types for panel operations.
//!
//! Every failure a caller can observe is one of these variants. Credential and
//! token failures all collapse into [`PanelError::Unauthenticated`].

use keyforge_auth::AuthError;
use keyforge_ledger::LedgerError;
use thiserror::Error;

/// Result type for panel operations.
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors surfaced by the panel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("service unavailable: maintenance in progress")]
    ServiceUnavailable,

    #[error("insufficient points: {required} required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PanelError {
    /// Returns a stable snake_case name for the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<AuthError> for PanelError {
    fn from(err: AuthError) -> Self {
        if err.is_unauthenticated() {
            return Self::Unauthenticated;
        }
        match err {
            AuthError::ServiceUnavailable => Self::ServiceUnavailable,
            AuthError::Forbidden { role, operation } => {
                Self::Forbidden(format!("role {role} may not {operation}"))
            }
            AuthError::UsernameTaken(name) => Self::InvalidInput(format!("username already taken: {name}")),
            AuthError::InvalidSigningKey(msg) => Self::Config(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<LedgerError> for PanelError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds { required, available } => {
                Self::InsufficientFunds { required, available }
            }
            LedgerError::KeyNotFound { .. } | LedgerError::UnknownScope(_) => Self::NotFound(err.to_string()),
            LedgerError::InvalidDeviceSlots(_) => Self::InvalidInput(err.to_string()),
            LedgerError::ScopeExists(_) | LedgerError::CodeSpaceExhausted(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<keyforge_types::Error> for PanelError {
    fn from(err: keyforge_types::Error) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
