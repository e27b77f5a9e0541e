//! Points ledger and key registry for KeyForge.
//!
//! Each [`Scope`] owns one [`Account`]: a points [`Pool`] plus the
//! [`KeyRegistry`] of keys minted from it. The global scope holds the shared
//! pool; every reseller gets a private scope. The [`Ledger`] keeps one lock
//! per account and runs the issuance transaction (price, debit, mint) under
//! it.

mod account;
mod code;
mod error;
mod ledger;
mod pool;
pub mod pricing;
mod registry;
mod scope;

pub use account::{Account, Issued};
pub use code::{CodeGenerator, DEFAULT_PREFIX, RandomCodes, SUFFIX_LEN};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{AccountSnapshot, Ledger};
pub use pool::Pool;
pub use pricing::price_of;
pub use registry::{KeyRecord, KeyRegistry, KeyRequest, MAX_CODE_ATTEMPTS};
pub use scope::Scope;
