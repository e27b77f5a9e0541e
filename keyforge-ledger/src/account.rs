//! A pool and the keys minted from it.

use crate::code::CodeGenerator;
use crate::error::{LedgerError, LedgerResult};
use crate::pool::Pool;
use crate::pricing::price_of;
use crate::registry::{KeyRecord, KeyRegistry, KeyRequest};
use crate::scope::Scope;
use keyforge_types::KeyId;
use serde::{Deserialize, Serialize};

/// Outcome of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issued {
    pub key: KeyRecord,
    /// Points charged.
    pub cost: u64,
    /// Pool balance after the debit.
    pub balance: u64,
}

/// The state of one scope: its pool and its registry.
#[derive(Debug, Clone)]
pub struct Account {
    pool: Pool,
    registry: KeyRegistry,
}

impl Account {
    /// Creates an account for `scope` with an initial balance.
    #[must_use]
    pub fn new(scope: Scope, balance: u64) -> Self {
        Self {
            pool: Pool::new(balance),
            registry: KeyRegistry::new(scope),
        }
    }

    /// Returns the scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.registry.scope()
    }

    /// Returns the pool balance.
    #[must_use]
    pub fn balance(&self) -> u64 {
        self.pool.balance()
    }

    /// Returns the key registry.
    #[must_use]
    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    /// Removes points without minting anything.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if the pool is too small.
    pub fn debit(&mut self, amount: u64) -> LedgerResult<u64> {
        self.pool.debit(amount)
    }

    /// Prices the request, debits the pool and mints the key.
    ///
    /// All checks (slots, code uniqueness, funds) run before anything is
    /// mutated, so a failure leaves both pool and registry untouched and
    /// consumes no key ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDeviceSlots`] for zero slots,
    /// [`LedgerError::CodeSpaceExhausted`] if no unique code was drawn, and
    /// [`LedgerError::InsufficientFunds`] if the pool cannot cover the price.
    pub fn issue(&mut self, request: &KeyRequest, codes: &dyn CodeGenerator) -> LedgerResult<Issued> {
        if request.device_slots == 0 {
            return Err(LedgerError::InvalidDeviceSlots(request.device_slots));
        }

        let cost = price_of(request.class, request.duration);
        let code = self.registry.unique_code(codes, request)?;
        let balance = self.pool.debit(cost)?;
        let key = self.registry.mint(code, request);

        Ok(Issued { key, cost, balance })
    }

    /// Revokes a key in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if no such key is listed.
    pub fn revoke(&mut self, id: KeyId) -> LedgerResult<KeyRecord> {
        self.registry.revoke(id)
    }
}
