//! In-memory credential store.
//!
//! Holds one record per operator, indexed by ID and by username. Operators are
//! never removed; IDs are assigned sequentially starting at 1.

use crate::error::{AuthError, AuthResult};
use keyforge_types::{OperatorId, Role};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// An operator identity record.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Operator {
    /// Stable identifier.
    pub id: OperatorId,
    /// Unique login name.
    pub username: String,
    /// Opaque password hash.
    #[serde(skip)]
    pub password_hash: String,
    /// Privilege level.
    pub role: Role,
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operator")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug)]
struct Inner {
    by_id: BTreeMap<OperatorId, Operator>,
    by_username: HashMap<String, OperatorId>,
    next_id: OperatorId,
}

/// Thread-safe store of operator records.
#[derive(Debug)]
pub struct CredentialStore {
    inner: RwLock<Inner>,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                by_id: BTreeMap::new(),
                by_username: HashMap::new(),
                next_id: OperatorId::new(1),
            }),
        }
    }

    // Every write validates before mutating, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new operator and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is already in use.
    pub fn insert(&self, username: &str, password_hash: String, role: Role) -> AuthResult<Operator> {
        self.insert_with(username, password_hash, role, |_| ())
            .map(|(operator, ())| operator)
    }

    /// Registers a new operator, running `attach` before the record becomes
    /// visible to readers. Used to set up per-operator state (such as a
    /// private pool) that must exist as soon as the operator can log in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is already in use;
    /// `attach` is not called in that case.
    pub fn insert_with<T>(
        &self,
        username: &str,
        password_hash: String,
        role: Role,
        attach: impl FnOnce(&Operator) -> T,
    ) -> AuthResult<(Operator, T)> {
        let mut inner = self.write();
        if inner.by_username.contains_key(username) {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let id = inner.next_id;
        inner.next_id = id.next();

        let operator = Operator {
            id,
            username: username.to_string(),
            password_hash,
            role,
        };
        let attached = attach(&operator);
        inner.by_username.insert(operator.username.clone(), id);
        inner.by_id.insert(id, operator.clone());

        debug!(operator_id = %id, username, role = %role, "Operator registered");
        Ok((operator, attached))
    }

    /// Looks up an operator by ID.
    #[must_use]
    pub fn get(&self, id: OperatorId) -> Option<Operator> {
        self.read().by_id.get(&id).cloned()
    }

    /// Looks up an operator by username.
    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<Operator> {
        let inner = self.read();
        inner
            .by_username
            .get(username)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    /// Returns true if the username is registered.
    #[must_use]
    pub fn contains_username(&self, username: &str) -> bool {
        self.read().by_username.contains_key(username)
    }

    /// Returns every operator, ordered by ID.
    #[must_use]
    pub fn list(&self) -> Vec<Operator> {
        self.read().by_id.values().cloned().collect()
    }

    /// Returns the number of registered operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    /// Returns true if no operator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }
}
