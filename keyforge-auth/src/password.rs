//! Password hashing.
//!
//! The rest of the workspace only sees the [`PasswordHasher`] capability.
//! The default implementation stores Argon2id hashes in PHC string format.

use crate::error::{AuthError, AuthResult};
use argon2::password_hash::SaltString;
use argon2::{Argon2, Params, PasswordHash, Version};
use argon2::{PasswordHasher as _, PasswordVerifier as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Size of generated salts in bytes.
pub const SALT_SIZE: usize = 16;

/// Hashes and verifies operator passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into an opaque, self-describing string.
    fn hash(&self, plain: &str) -> AuthResult<String>;

    /// Returns true if `plain` matches `hash`. Malformed hashes never match.
    fn verify(&self, plain: &str, hash: &str) -> bool;
}

/// Argon2id cost parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id implementation of [`PasswordHasher`].
#[derive(Debug, Clone)]
pub struct Argon2Passwords {
    params: Params,
}

impl Argon2Passwords {
    /// Creates a hasher with the given cost parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if Argon2 rejects the parameters.
    pub fn new(params: &HashParams) -> AuthResult<Self> {
        let params = Params::new(params.memory_cost, params.time_cost, params.parallelism, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Passwords {
    fn hash(&self, plain: &str) -> AuthResult<String> {
        let mut salt_bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain: &str, hash: &str) -> bool {
        // Parameters embedded in the PHC string take precedence over ours.
        PasswordHash::new(hash)
            .map(|parsed| self.argon2().verify_password(plain.as_bytes(), &parsed).is_ok())
            .unwrap_or(false)
    }
}
