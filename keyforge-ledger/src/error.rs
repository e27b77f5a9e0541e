//! Error types for the ledger.

use crate::scope::Scope;
use keyforge_types::KeyId;
use thiserror::Error;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The debit would take the pool below zero.
    #[error("insufficient points: {required} required, {available} available")]
    InsufficientFunds { required: u64, available: u64 },

    /// No key with this ID in the scope.
    #[error("key {id} not found in {scope} scope")]
    KeyNotFound { scope: Scope, id: KeyId },

    /// The scope has no account.
    #[error("no account for {0} scope")]
    UnknownScope(Scope),

    /// An account for this scope already exists.
    #[error("account for {0} scope already exists")]
    ScopeExists(Scope),

    /// Device slots must be positive.
    #[error("device slots must be positive, got {0}")]
    InvalidDeviceSlots(u32),

    /// No unique code was produced within the attempt budget.
    #[error("could not generate a unique key code after {0} attempts")]
    CodeSpaceExhausted(usize),
}
