//! Panel configuration.
//!
//! Loaded from a JSON file. Every field has a default, so `{}` is a valid
//! configuration: an empty shared pool, no operators, maintenance off.

use crate::error::{PanelError, PanelResult};
use keyforge_auth::{HashParams, MaintenancePolicy};
use keyforge_ledger::DEFAULT_PREFIX;
use keyforge_types::Role;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Points given to a reseller provisioned without an explicit balance.
pub const DEFAULT_RESELLER_BALANCE: u64 = 100;

/// Session lifetime when none is configured.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Maintenance state at startup and who it lets through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub policy: MaintenancePolicy,
}

/// An operator created at bootstrap.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSeed {
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Initial private balance; only valid for roles with a private pool.
    #[serde(default)]
    pub balance: Option<u64>,
}

impl std::fmt::Debug for OperatorSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorSeed")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("balance", &self.balance)
            .finish()
    }
}

/// Top-level panel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Initial shared pool balance.
    pub shared_pool: u64,
    pub default_reseller_balance: u64,
    pub session_ttl_secs: u64,
    /// Prefix of generated key codes.
    pub code_prefix: String,
    /// Base64 Ed25519 seed for session tokens. A random key is generated per
    /// process when absent, which invalidates sessions on restart.
    pub token_secret: Option<String>,
    pub maintenance: MaintenanceConfig,
    pub password_hashing: HashParams,
    pub operators: Vec<OperatorSeed>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            shared_pool: 0,
            default_reseller_balance: DEFAULT_RESELLER_BALANCE,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            code_prefix: DEFAULT_PREFIX.to_string(),
            token_secret: None,
            maintenance: MaintenanceConfig::default(),
            password_hashing: HashParams::default(),
            operators: Vec::new(),
        }
    }
}

impl PanelConfig {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] for malformed JSON or invalid values.
    pub fn from_json_str(json: &str) -> PanelResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| PanelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> PanelResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PanelError::Config(format!("failed to read {}: {e}", path.display())))?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), operators = config.operators.len(), "Loaded panel config");
        Ok(config)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] describing the first problem found.
    pub fn validate(&self) -> PanelResult<()> {
        if self.session_ttl_secs == 0 {
            return Err(PanelError::Config("session_ttl_secs must be positive".into()));
        }
        if self.code_prefix.trim().is_empty() {
            return Err(PanelError::Config("code_prefix must not be empty".into()));
        }
        if let Some(seed) = self
            .operators
            .iter()
            .find(|seed| seed.balance.is_some() && !seed.role.has_private_pool())
        {
            return Err(PanelError::Config(format!(
                "operator {} has a balance but role {} has no private pool",
                seed.username, seed.role
            )));
        }
        Ok(())
    }
}
