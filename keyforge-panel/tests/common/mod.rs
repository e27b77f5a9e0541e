//! Shared test helpers for panel tests.

#![allow(dead_code)]

use keyforge_auth::{Argon2Passwords, Ed25519Tokens, HashParams};
use keyforge_ledger::{KeyRequest, RandomCodes};
use keyforge_panel::{Capabilities, OperatorSeed, Panel, PanelConfig};
use keyforge_types::{KeyClass, KeyDuration, OperatorId, Role};
use std::sync::Arc;

pub const TEST_SEED: [u8; 32] = [7; 32];

/// Reseller's starting balance in the seeded panel.
pub const RESELLER_BALANCE: u64 = 50;

/// Cheap Argon2 parameters (fast but insecure).
pub fn fast_params() -> HashParams {
    HashParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn password(role: Role) -> String {
    format!("{role}-pass")
}

/// Seeded operators get IDs in [`Role::ALL`] order, starting at 1.
pub fn id_of(role: Role) -> OperatorId {
    let position = Role::ALL.iter().position(|r| *r == role).unwrap();
    OperatorId::new(position as u64 + 1)
}

/// Config with one operator per role, named after the role.
pub fn test_config(shared_pool: u64) -> PanelConfig {
    PanelConfig {
        shared_pool,
        password_hashing: fast_params(),
        operators: Role::ALL
            .iter()
            .map(|role| OperatorSeed {
                username: role.label().to_string(),
                password: password(*role),
                role: *role,
                balance: role.has_private_pool().then_some(RESELLER_BALANCE),
            })
            .collect(),
        ..PanelConfig::default()
    }
}

pub fn capabilities(seed: [u8; 32]) -> Capabilities {
    Capabilities {
        passwords: Arc::new(Argon2Passwords::new(&fast_params()).unwrap()),
        tokens: Arc::new(Ed25519Tokens::from_seed(&seed)),
        codes: Arc::new(RandomCodes::default()),
    }
}

pub fn panel_with(config: &PanelConfig) -> Panel {
    Panel::with_capabilities(config, capabilities(TEST_SEED)).unwrap()
}

pub fn panel(shared_pool: u64) -> Panel {
    panel_with(&test_config(shared_pool))
}

/// Logs in the seeded operator of `role` and returns its token.
pub fn login(panel: &Panel, role: Role) -> String {
    panel.login(role.label(), &password(role)).unwrap().token
}

pub fn request(class: KeyClass, duration: KeyDuration) -> KeyRequest {
    KeyRequest {
        class,
        duration,
        device_slots: 1,
    }
}

pub fn vip_day() -> KeyRequest {
    request(KeyClass::Vip, KeyDuration::OneDay)
}

pub fn free_day() -> KeyRequest {
    request(KeyClass::Free, KeyDuration::OneDay)
}
