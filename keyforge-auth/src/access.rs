//! Role-gated access control.
//!
//! Every panel operation declares the exact set of roles it admits. There is
//! no inheritance: an admin may issue keys only because [`ISSUE_KEY`] lists
//! `Admin`, not because admins outrank resellers.

use crate::error::{AuthError, AuthResult};
use crate::session::OperatorIdentity;
use keyforge_types::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A set of roles, usable in `const` position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Builds a set from a list of roles.
    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= Self::bit(roles[i]);
            i += 1;
        }
        Self(bits)
    }

    const fn bit(role: Role) -> u8 {
        1 << (role as u8)
    }

    /// Returns true if the set contains `role`.
    #[must_use]
    pub const fn contains(&self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    /// Returns a copy of the set with `role` added.
    #[must_use]
    pub const fn with(self, role: Role) -> Self {
        Self(self.0 | Self::bit(role))
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the members in ascending privilege.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(|role| self.contains(*role))
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, RoleSet::with)
    }
}

impl Serialize for RoleSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let roles = Vec::<Role>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}

/// Roles that may view the panel snapshot.
pub const VIEW_PANEL: RoleSet =
    RoleSet::of(&[Role::Moderator, Role::Reseller, Role::Admin, Role::SuperAdmin]);

/// Roles that may flip the maintenance flag.
pub const TOGGLE_MAINTENANCE: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);

/// Roles that may run the issuance transaction.
pub const ISSUE_KEY: RoleSet =
    RoleSet::of(&[Role::Moderator, Role::Reseller, Role::Admin, Role::SuperAdmin]);

/// Roles that may revoke keys. Resellers are further confined to their own scope.
pub const REVOKE_KEY: RoleSet = RoleSet::of(&[Role::Reseller, Role::Admin, Role::SuperAdmin]);

/// Roles that may create operators.
pub const PROVISION_OPERATOR: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);

/// Roles that may inspect other operators and their key scopes.
pub const INSPECT_OPERATORS: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);

/// Roles that may act on a scope other than their own.
pub const CROSS_SCOPE: RoleSet = RoleSet::of(&[Role::Admin, Role::SuperAdmin]);

/// A role-gated panel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ViewPanel,
    ToggleMaintenance,
    IssueKey,
    RevokeKey,
    ProvisionOperator,
    InspectOperators,
}

impl Operation {
    /// Returns the roles admitted by this operation.
    #[must_use]
    pub const fn allowed_roles(&self) -> RoleSet {
        match self {
            Self::ViewPanel => VIEW_PANEL,
            Self::ToggleMaintenance => TOGGLE_MAINTENANCE,
            Self::IssueKey => ISSUE_KEY,
            Self::RevokeKey => REVOKE_KEY,
            Self::ProvisionOperator => PROVISION_OPERATOR,
            Self::InspectOperators => INSPECT_OPERATORS,
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ViewPanel => "view the panel",
            Self::ToggleMaintenance => "toggle maintenance",
            Self::IssueKey => "issue keys",
            Self::RevokeKey => "revoke keys",
            Self::ProvisionOperator => "provision operators",
            Self::InspectOperators => "inspect operators",
        }
    }
}

/// Returns the roles an operator with `creator` role may provision.
#[must_use]
pub const fn provisionable_by(creator: Role) -> RoleSet {
    match creator {
        Role::SuperAdmin => RoleSet::of(&Role::ALL),
        Role::Admin => RoleSet::of(&[Role::User, Role::Moderator, Role::Reseller]),
        Role::User | Role::Moderator | Role::Reseller => RoleSet::EMPTY,
    }
}

/// Admits `identity` if its role is in `allowed`.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] otherwise.
pub fn authorize<'a>(
    identity: &'a OperatorIdentity,
    allowed: RoleSet,
    operation: &str,
) -> AuthResult<&'a OperatorIdentity> {
    if allowed.contains(identity.role) {
        Ok(identity)
    } else {
        warn!(operator_id = %identity.id, role = %identity.role, operation, "Access denied");
        Err(AuthError::Forbidden {
            role: identity.role,
            operation: operation.to_string(),
        })
    }
}

/// Admits `identity` for a panel operation.
///
/// # Errors
///
/// Returns [`AuthError::Forbidden`] if the role is not admitted.
pub fn authorize_operation(
    identity: &OperatorIdentity,
    operation: Operation,
) -> AuthResult<&OperatorIdentity> {
    authorize(identity, operation.allowed_roles(), operation.label())
}
