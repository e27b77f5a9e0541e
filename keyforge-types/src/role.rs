//! Operator roles.
//!
//! Roles form a closed set. They are listed here in ascending privilege, but
//! no code derives permissions from that order: every operation names the
//! roles it admits explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege level of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May log in; holds no panel privileges.
    User,
    /// Issues keys from the shared pool and sees global keys.
    Moderator,
    /// Issues keys from a private pool into a private scope.
    Reseller,
    /// Runs the panel: maintenance, provisioning, revocation.
    Admin,
    /// Admin with the right to provision other admins.
    SuperAdmin,
}

impl Role {
    /// Every role, in ascending privilege.
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Moderator,
        Role::Reseller,
        Role::Admin,
        Role::SuperAdmin,
    ];

    /// Returns true if operators with this role spend from their own pool
    /// and own their own key scope.
    #[must_use]
    pub fn has_private_pool(&self) -> bool {
        matches!(self, Self::Reseller)
    }

    /// Returns the wire label of this role.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Reseller => "reseller",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|role| role.label() == normalized)
            .ok_or_else(|| crate::Error::UnknownRole(s.to_string()))
    }
}
