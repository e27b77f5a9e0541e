//! Ownership scopes for pools and keys.

use keyforge_types::{OperatorId, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The owner of a pool and the keys minted from it.
///
/// The global scope pairs the shared pool with the global key list; each
/// operator scope pairs one reseller's private pool with their private keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "owner")]
pub enum Scope {
    Global,
    Operator(OperatorId),
}

impl Scope {
    /// Returns the scope an operator spends from and mints into.
    #[must_use]
    pub fn for_operator(id: OperatorId, role: Role) -> Self {
        if role.has_private_pool() {
            Self::Operator(id)
        } else {
            Self::Global
        }
    }

    /// Returns the short tag embedded in key codes.
    #[must_use]
    pub fn code_tag(&self) -> &'static str {
        match self {
            Self::Global => "GLB",
            Self::Operator(_) => "RES",
        }
    }

    /// Returns the owning operator, if any.
    #[must_use]
    pub fn owner(&self) -> Option<OperatorId> {
        match self {
            Self::Global => None,
            Self::Operator(id) => Some(*id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Operator(id) => write!(f, "operator {id}"),
        }
    }
}
