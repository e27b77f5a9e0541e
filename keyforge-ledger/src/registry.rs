//! Per-scope key registry.

use crate::code::CodeGenerator;
use crate::error::{LedgerError, LedgerResult};
use crate::scope::Scope;
use chrono::{DateTime, Utc};
use keyforge_types::{KeyClass, KeyDuration, KeyId, KeyStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Attempts at drawing a code that is unique within the scope.
pub const MAX_CODE_ATTEMPTS: usize = 8;

/// What the caller asks to mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    pub class: KeyClass,
    pub duration: KeyDuration,
    pub device_slots: u32,
}

/// A minted license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Sequential within the scope, starting at 1.
    pub id: KeyId,
    /// Opaque code handed to the customer.
    pub code: String,
    pub status: KeyStatus,
    pub class: KeyClass,
    pub duration: KeyDuration,
    /// Devices the key may be bound to.
    pub device_slots: u32,
    /// Devices currently bound.
    pub bound_devices: u32,
    pub issued_at: DateTime<Utc>,
}

impl KeyRecord {
    /// Returns the occupancy as `bound/slots`, e.g. `0/3`.
    #[must_use]
    pub fn binding_count(&self) -> String {
        format!("{}/{}", self.bound_devices, self.device_slots)
    }
}

/// The keys of one scope.
///
/// Minting is crate-private: keys only come into existence through
/// [`Account::issue`](crate::Account::issue), after the pool is debited.
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    scope: Scope,
    records: BTreeMap<KeyId, KeyRecord>,
    codes: HashSet<String>,
    next_id: KeyId,
}

impl KeyRegistry {
    /// Creates an empty registry for `scope`.
    #[must_use]
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            records: BTreeMap::new(),
            codes: HashSet::new(),
            next_id: KeyId::FIRST,
        }
    }

    /// Returns the scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Returns the ID the next minted key will receive.
    #[must_use]
    pub fn next_id(&self) -> KeyId {
        self.next_id
    }

    /// Returns the listed keys in ID order.
    #[must_use]
    pub fn list(&self) -> Vec<KeyRecord> {
        self.records.values().cloned().collect()
    }

    /// Looks up a key by ID.
    #[must_use]
    pub fn get(&self, id: KeyId) -> Option<&KeyRecord> {
        self.records.get(&id)
    }

    /// Returns true if `code` was ever minted in this scope. Codes of revoked
    /// keys stay reserved.
    #[must_use]
    pub fn contains_code(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Returns the number of listed keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no key is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Draws a code not yet used in this scope.
    pub(crate) fn unique_code(
        &self,
        codes: &dyn CodeGenerator,
        request: &KeyRequest,
    ) -> LedgerResult<String> {
        (0..MAX_CODE_ATTEMPTS)
            .map(|_| codes.generate(self.scope, request.class, request.duration))
            .find(|code| !self.codes.contains(code))
            .ok_or(LedgerError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
    }

    /// Lists a new key under the next ID. `code` must come from
    /// [`KeyRegistry::unique_code`].
    pub(crate) fn mint(&mut self, code: String, request: &KeyRequest) -> KeyRecord {
        let id = self.next_id;
        self.next_id = id.next();

        let record = KeyRecord {
            id,
            code,
            status: KeyStatus::Active,
            class: request.class,
            duration: request.duration,
            device_slots: request.device_slots,
            bound_devices: 0,
            issued_at: Utc::now(),
        };
        self.codes.insert(record.code.clone());
        self.records.insert(id, record.clone());
        record
    }

    /// Removes a key from the scope and returns it marked revoked. Neither its
    /// ID nor its code is reused.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if no such key is listed.
    pub fn revoke(&mut self, id: KeyId) -> LedgerResult<KeyRecord> {
        let mut record = self.records.remove(&id).ok_or(LedgerError::KeyNotFound {
            scope: self.scope,
            id,
        })?;
        record.status = KeyStatus::Revoked;
        Ok(record)
    }
}
