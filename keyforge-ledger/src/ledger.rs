//! The ledger: every account, each behind its own lock.
//!
//! Requests against the same scope serialize on that scope's mutex, so two
//! debits can never both pass the funds check against the same balance.
//! Requests against different scopes never contend.

use crate::account::{Account, Issued};
use crate::code::CodeGenerator;
use crate::error::{LedgerError, LedgerResult};
use crate::registry::{KeyRecord, KeyRequest};
use crate::scope::Scope;
use keyforge_types::{KeyId, OperatorId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{info, warn};

type SharedAccount = Arc<Mutex<Account>>;

/// Balance and keys of one scope, read under a single lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub scope: Scope,
    pub balance: u64,
    pub keys: Vec<KeyRecord>,
}

/// Owns the shared account and every private account.
pub struct Ledger {
    shared: SharedAccount,
    private: RwLock<HashMap<OperatorId, SharedAccount>>,
    codes: Arc<dyn CodeGenerator>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("shared", &self.shared)
            .field("private_accounts", &self.read_private().len())
            .finish_non_exhaustive()
    }
}

// Account methods check before they mutate, so state behind a poisoned lock
// is still consistent.
fn lock(account: &Mutex<Account>) -> MutexGuard<'_, Account> {
    account.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Ledger {
    /// Creates a ledger whose shared pool holds `shared_balance` points.
    pub fn new(shared_balance: u64, codes: Arc<dyn CodeGenerator>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Account::new(Scope::Global, shared_balance))),
            private: RwLock::new(HashMap::new()),
            codes,
        }
    }

    fn read_private(&self) -> std::sync::RwLockReadGuard<'_, HashMap<OperatorId, SharedAccount>> {
        self.private.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a private account for `owner` with an initial balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ScopeExists`] if the owner already has one.
    pub fn open_account(&self, owner: OperatorId, balance: u64) -> LedgerResult<()> {
        let mut private = self.private.write().unwrap_or_else(PoisonError::into_inner);
        let scope = Scope::Operator(owner);
        if private.contains_key(&owner) {
            return Err(LedgerError::ScopeExists(scope));
        }
        private.insert(owner, Arc::new(Mutex::new(Account::new(scope, balance))));
        info!(scope = %scope, balance, "Account opened");
        Ok(())
    }

    /// Returns true if the scope has an account.
    #[must_use]
    pub fn has_account(&self, scope: Scope) -> bool {
        match scope {
            Scope::Global => true,
            Scope::Operator(owner) => self.read_private().contains_key(&owner),
        }
    }

    /// Returns every scope with an account, global first, then by owner.
    #[must_use]
    pub fn scopes(&self) -> Vec<Scope> {
        let mut owners: Vec<OperatorId> = self.read_private().keys().copied().collect();
        owners.sort();
        std::iter::once(Scope::Global)
            .chain(owners.into_iter().map(Scope::Operator))
            .collect()
    }

    fn account(&self, scope: Scope) -> LedgerResult<SharedAccount> {
        match scope {
            Scope::Global => Ok(Arc::clone(&self.shared)),
            Scope::Operator(owner) => self
                .read_private()
                .get(&owner)
                .cloned()
                .ok_or(LedgerError::UnknownScope(scope)),
        }
    }

    /// Runs `f` while holding the scope's lock.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownScope`] if the scope has no account, or
    /// whatever `f` returns.
    pub fn with_account<T>(
        &self,
        scope: Scope,
        f: impl FnOnce(&mut Account) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let account = self.account(scope)?;
        let mut guard = lock(&account);
        f(&mut guard)
    }

    /// Returns the balance of a scope's pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownScope`] if the scope has no account.
    pub fn balance(&self, scope: Scope) -> LedgerResult<u64> {
        self.with_account(scope, |account| Ok(account.balance()))
    }

    /// Debits a scope's pool and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if the pool is too small, or
    /// [`LedgerError::UnknownScope`].
    pub fn debit(&self, scope: Scope, amount: u64) -> LedgerResult<u64> {
        self.with_account(scope, |account| account.debit(amount))
    }

    /// Runs the issuance transaction: price, debit, mint. All or nothing.
    ///
    /// # Errors
    ///
    /// See [`Account::issue`]; also [`LedgerError::UnknownScope`].
    pub fn issue(&self, scope: Scope, request: &KeyRequest) -> LedgerResult<Issued> {
        let result = self.with_account(scope, |account| account.issue(request, self.codes.as_ref()));
        match &result {
            Ok(issued) => info!(
                scope = %scope,
                key_id = %issued.key.id,
                class = %request.class,
                duration = %request.duration,
                cost = issued.cost,
                balance = issued.balance,
                "Key issued"
            ),
            Err(e) => warn!(scope = %scope, error = %e, "Key issuance rejected"),
        }
        result
    }

    /// Revokes a key in a scope.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] or [`LedgerError::UnknownScope`].
    pub fn revoke(&self, scope: Scope, id: KeyId) -> LedgerResult<KeyRecord> {
        let record = self.with_account(scope, |account| account.revoke(id))?;
        info!(scope = %scope, key_id = %id, "Key revoked");
        Ok(record)
    }

    /// Lists the keys of a scope in ID order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownScope`] if the scope has no account.
    pub fn list(&self, scope: Scope) -> LedgerResult<Vec<KeyRecord>> {
        self.with_account(scope, |account| Ok(account.registry().list()))
    }

    /// Reads balance and keys of a scope atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownScope`] if the scope has no account.
    pub fn snapshot(&self, scope: Scope) -> LedgerResult<AccountSnapshot> {
        self.with_account(scope, |account| {
            Ok(AccountSnapshot {
                scope,
                balance: account.balance(),
                keys: account.registry().list(),
            })
        })
    }
}
