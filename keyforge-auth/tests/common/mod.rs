//! Shared test helpers for auth tests.

#![allow(dead_code)]

use keyforge_auth::{
    Argon2Passwords, CredentialStore, Ed25519Tokens, HashParams, PasswordHasher, SessionAuthenticator,
};
use keyforge_types::Role;
use std::sync::Arc;

/// Fixed seed so tests can build a second service with the same key.
pub const TEST_SEED: [u8; 32] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 30, 31, 32,
];

/// Cheap Argon2 parameters (fast but insecure).
pub fn fast_params() -> HashParams {
    HashParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

pub fn fast_hasher() -> Argon2Passwords {
    Argon2Passwords::new(&fast_params()).unwrap()
}

pub fn test_tokens() -> Arc<Ed25519Tokens> {
    Arc::new(Ed25519Tokens::from_seed(&TEST_SEED))
}

/// A store holding one operator per role, named after the role.
pub fn seeded_store() -> Arc<CredentialStore> {
    let hasher = fast_hasher();
    let store = Arc::new(CredentialStore::new());
    for role in Role::ALL {
        let hash = hasher.hash(&format!("{role}-pass")).unwrap();
        store.insert(role.label(), hash, role).unwrap();
    }
    store
}

pub fn authenticator(store: Arc<CredentialStore>) -> SessionAuthenticator {
    SessionAuthenticator::new(store, test_tokens(), 3600)
}
