//! Maintenance gate.
//!
//! While maintenance is active only exempt operators may log in. Existing
//! sessions are unaffected; the gate is consulted at login only.

use crate::access::RoleSet;
use crate::error::{AuthError, AuthResult};
use keyforge_types::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Who may log in while maintenance is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenancePolicy {
    /// Usernames exempt from the gate.
    pub exempt_usernames: BTreeSet<String>,
    /// Roles exempt from the gate.
    pub exempt_roles: RoleSet,
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        Self {
            exempt_usernames: BTreeSet::new(),
            exempt_roles: RoleSet::of(&[Role::Admin, Role::SuperAdmin]),
        }
    }
}

impl MaintenancePolicy {
    /// Returns true if the login attempt is exempt from the gate. `role` is
    /// None unless the attempt's credentials verified.
    #[must_use]
    pub fn is_exempt(&self, username: &str, role: Option<Role>) -> bool {
        self.exempt_usernames.contains(username)
            || role.is_some_and(|role| self.exempt_roles.contains(role))
    }
}

/// Decides a login attempt against the flag state.
///
/// # Errors
///
/// Returns [`AuthError::ServiceUnavailable`] when maintenance is active and the
/// attempt is not exempt.
pub fn check_login_allowed(
    policy: &MaintenancePolicy,
    username: &str,
    role: Option<Role>,
    maintenance_active: bool,
) -> AuthResult<()> {
    if !maintenance_active || policy.is_exempt(username, role) {
        Ok(())
    } else {
        Err(AuthError::ServiceUnavailable)
    }
}

/// The process-wide maintenance flag with its exemption policy.
#[derive(Debug)]
pub struct MaintenanceGate {
    active: AtomicBool,
    policy: MaintenancePolicy,
}

impl MaintenanceGate {
    /// Creates a gate with the given initial state.
    #[must_use]
    pub fn new(active: bool, policy: MaintenancePolicy) -> Self {
        Self {
            active: AtomicBool::new(active),
            policy,
        }
    }

    /// Returns true if maintenance is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Returns the exemption policy.
    #[must_use]
    pub fn policy(&self) -> &MaintenancePolicy {
        &self.policy
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&self) -> bool {
        let active = !self.active.fetch_xor(true, Ordering::SeqCst);
        info!(active, "Maintenance mode toggled");
        active
    }

    /// Decides a login attempt against the current flag state.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ServiceUnavailable`] when maintenance is active and
    /// the attempt is not exempt.
    pub fn check_login(&self, username: &str, role: Option<Role>) -> AuthResult<()> {
        check_login_allowed(&self.policy, username, role, self.is_active())
    }
}
