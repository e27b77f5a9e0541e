//! KeyForge operator panel.
//!
//! Ties the auth and ledger crates together behind [`Panel`], the single
//! state container every operation runs against:
//! - Login with the maintenance gate in front of it
//! - The panel snapshot (balance, maintenance flag, visible keys)
//! - Maintenance toggling
//! - The issuance transaction and revocation
//! - Operator provisioning and inspection
//!
//! The [`console`] module is the only transport-aware layer: it reads
//! JSON-lines requests and maps outcomes to HTTP-style status codes.

mod config;
pub mod console;
mod error;
mod panel;

pub use config::{
    DEFAULT_RESELLER_BALANCE, DEFAULT_SESSION_TTL_SECS, MaintenanceConfig, OperatorSeed, PanelConfig,
};
pub use error::{PanelError, PanelResult};
pub use panel::{
    Capabilities, IssuedKey, LoginOutcome, MaintenanceState, OperatorSummary, Panel, PanelSnapshot,
    ProvisionRequest,
};
