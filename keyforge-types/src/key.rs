//! Key classes, durations and statuses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a license key. Each class has its own price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyClass {
    /// Premium keys.
    #[serde(rename = "VIP")]
    Vip,
    /// Standard keys.
    #[serde(rename = "Free")]
    Free,
}

impl KeyClass {
    /// Every class.
    pub const ALL: [KeyClass; 2] = [KeyClass::Vip, KeyClass::Free];

    /// Returns the wire label of this class.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::Free => "Free",
        }
    }
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KeyClass {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        KeyClass::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| crate::Error::UnknownKeyClass(s.to_string()))
    }
}

/// Validity period of a license key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyDuration {
    #[serde(rename = "1 Day")]
    OneDay,
    #[serde(rename = "2 Days")]
    TwoDays,
    #[serde(rename = "7 Days")]
    SevenDays,
    #[serde(rename = "Lifetime")]
    Lifetime,
}

impl KeyDuration {
    /// Every duration, shortest first.
    pub const ALL: [KeyDuration; 4] = [
        KeyDuration::OneDay,
        KeyDuration::TwoDays,
        KeyDuration::SevenDays,
        KeyDuration::Lifetime,
    ];

    /// Returns the wire label of this duration (e.g. `"7 Days"`).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneDay => "1 Day",
            Self::TwoDays => "2 Days",
            Self::SevenDays => "7 Days",
            Self::Lifetime => "Lifetime",
        }
    }

    /// Returns the label with whitespace removed, as embedded in key codes.
    #[must_use]
    pub fn compact_label(&self) -> String {
        self.label().split_whitespace().collect()
    }
}

impl fmt::Display for KeyDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KeyDuration {
    type Err = crate::Error;

    /// Accepts the wire label in any case, with or without inner whitespace
    /// (`"7 Days"`, `"7days"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.split_whitespace().collect();
        KeyDuration::ALL
            .into_iter()
            .find(|duration| duration.compact_label().eq_ignore_ascii_case(&compact))
            .ok_or_else(|| crate::Error::UnknownDuration(s.to_string()))
    }
}

/// Lifecycle state of a key record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    /// Listed in its scope and usable.
    Active,
    /// Removed from its scope.
    Revoked,
}

impl KeyStatus {
    /// Returns true if the key is usable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}
