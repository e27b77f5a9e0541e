//! Points pools.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};

/// A non-negative points balance.
///
/// A pool is not synchronized on its own; the [`Ledger`](crate::Ledger)
/// guards each pool together with its key registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pool {
    balance: u64,
}

impl Pool {
    /// Creates a pool holding `balance` points.
    #[must_use]
    pub const fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Returns the current balance.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Removes `amount` points and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] and leaves the balance
    /// untouched if the pool holds less than `amount`.
    pub fn debit(&mut self, amount: u64) -> LedgerResult<u64> {
        let remaining = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                required: amount,
                available: self.balance,
            })?;
        self.balance = remaining;
        Ok(remaining)
    }
}
