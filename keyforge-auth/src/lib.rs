//! Operator authentication and access control for KeyForge.
//!
//! This crate handles:
//! - The credential store (operator records indexed by ID and username)
//! - Password hashing behind the [`PasswordHasher`] capability (Argon2id)
//! - Session tokens behind the [`TokenService`] capability (Ed25519)
//! - Resolving bearer tokens to live operators
//! - Explicit per-operation role sets
//! - The maintenance gate on login
//!
//! # Token Format
//!
//! Tokens are formatted as: `base64url(claims).base64url(signature)`
//! The claims are a JSON object signed with Ed25519, containing the operator
//! ID, issued-at and expiry timestamps.

pub mod access;
mod credentials;
mod error;
mod maintenance;
mod password;
mod session;
mod token;

pub use access::{Operation, RoleSet, authorize, authorize_operation, provisionable_by};
pub use credentials::{CredentialStore, Operator};
pub use error::{AuthError, AuthResult};
pub use maintenance::{MaintenanceGate, MaintenancePolicy, check_login_allowed};
pub use password::{Argon2Passwords, HashParams, PasswordHasher};
pub use session::{OperatorIdentity, SessionAuthenticator, bearer_token};
pub use token::{Ed25519Tokens, SEED_SIZE, SessionClaims, TokenService};
