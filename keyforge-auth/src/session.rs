//! Session authentication.
//!
//! Turns a bearer token into the identity of a live operator. A session is
//! valid iff its token verifies, it has not expired, and the operator it names
//! is still in the credential store.

use crate::credentials::{CredentialStore, Operator};
use crate::error::{AuthError, AuthResult};
use crate::token::{SessionClaims, TokenService};
use keyforge_types::{OperatorId, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The resolved identity behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorIdentity {
    pub id: OperatorId,
    pub username: String,
    pub role: Role,
}

impl From<&Operator> for OperatorIdentity {
    fn from(operator: &Operator) -> Self {
        Self {
            id: operator.id,
            username: operator.username.clone(),
            role: operator.role,
        }
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// Only the `Bearer` scheme is accepted; scheme names are case-insensitive.
#[must_use]
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(char::is_whitespace)?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Issues session tokens and resolves them back to operators.
pub struct SessionAuthenticator {
    credentials: Arc<CredentialStore>,
    tokens: Arc<dyn TokenService>,
    ttl_secs: u64,
}

impl SessionAuthenticator {
    /// Creates an authenticator over the given store and token capability.
    pub fn new(credentials: Arc<CredentialStore>, tokens: Arc<dyn TokenService>, ttl_secs: u64) -> Self {
        Self {
            credentials,
            tokens,
            ttl_secs,
        }
    }

    /// Starts a session for `operator` and returns its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token capability fails to sign.
    pub fn start_session(&self, operator: &Operator) -> AuthResult<String> {
        let claims = SessionClaims::new(operator.id, chrono::Utc::now().timestamp(), self.ttl_secs);
        self.tokens.issue(&claims)
    }

    /// Resolves `token` to a live operator identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`] when no token is given, the
    /// token capability's error when verification fails, and
    /// [`AuthError::UnknownOperator`] when the operator no longer exists.
    pub fn authenticate(&self, token: Option<&str>) -> AuthResult<OperatorIdentity> {
        let token = token.ok_or(AuthError::MissingCredential)?;
        let claims = self.tokens.verify(token)?;

        let operator = self
            .credentials
            .get(claims.sub)
            .ok_or(AuthError::UnknownOperator(claims.sub))?;

        debug!(operator_id = %operator.id, role = %operator.role, "Session resolved");
        Ok(OperatorIdentity::from(&operator))
    }
}
