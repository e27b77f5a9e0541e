//! Key code generation.
//!
//! Codes look like `KCV-GLB-VIP-7Days-7QK2M9XH3TPA4W1R`: a configurable
//! prefix, the scope tag, the class, the compact duration, and a random
//! suffix. The suffix carries 80 bits from the OS RNG, so collisions are
//! negligible; the registry still rejects duplicates within a scope.

use crate::scope::Scope;
use keyforge_types::{KeyClass, KeyDuration};
use rand::Rng;

/// Crockford base32 alphabet (no I, L, O, U).
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Number of random symbols in a code suffix.
pub const SUFFIX_LEN: usize = 16;

/// Default code prefix.
pub const DEFAULT_PREFIX: &str = "KCV";

/// Produces candidate key codes.
pub trait CodeGenerator: Send + Sync {
    /// Returns a candidate code for a key of this shape.
    fn generate(&self, scope: Scope, class: KeyClass, duration: KeyDuration) -> String;
}

/// Generator drawing suffixes from the OS RNG.
#[derive(Debug, Clone)]
pub struct RandomCodes {
    prefix: String,
}

impl Default for RandomCodes {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl RandomCodes {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim().to_string(),
        }
    }

    fn suffix() -> String {
        let mut rng = rand::rngs::OsRng;
        (0..SUFFIX_LEN)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect()
    }
}

impl CodeGenerator for RandomCodes {
    fn generate(&self, scope: Scope, class: KeyClass, duration: KeyDuration) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.prefix,
            scope.code_tag(),
            class.label(),
            duration.compact_label(),
            Self::suffix()
        )
    }
}
