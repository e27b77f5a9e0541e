//! Core type definitions for KeyForge.
//!
//! This crate defines the vocabulary shared by every other crate:
//! - Operator and key identifiers (sequential, never reused)
//! - The closed set of operator roles
//! - Key classes, durations and statuses
//!
//! Nothing here holds state; the ledger and panel crates own all of it.

mod ids;
mod key;
mod role;

pub use ids::{KeyId, OperatorId};
pub use key::{KeyClass, KeyDuration, KeyStatus};
pub use role::Role;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing core types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown key class: {0}")]
    UnknownKeyClass(String),

    #[error("unknown key duration: {0}")]
    UnknownDuration(String),
}
