//! Key pricing.
//!
//! Each class has its own price table. A duration missing from its class's
//! table costs the cheapest tier of that class:
//!
//! | Class | 1 Day | 2 Days | 7 Days | Lifetime |
//! |-------|-------|--------|--------|----------|
//! | VIP   | 6     | (6)    | 30     | 100      |
//! | Free  | 3     | 5      | (3)    | (3)      |
//!
//! Parenthesized entries are the fallback.

use keyforge_types::{KeyClass, KeyDuration};

/// VIP price table.
pub const VIP_PRICES: &[(KeyDuration, u64)] = &[
    (KeyDuration::OneDay, 6),
    (KeyDuration::SevenDays, 30),
    (KeyDuration::Lifetime, 100),
];

/// Free price table.
pub const FREE_PRICES: &[(KeyDuration, u64)] = &[
    (KeyDuration::OneDay, 3),
    (KeyDuration::TwoDays, 5),
];

/// Returns the price table of a class.
#[must_use]
pub fn price_table(class: KeyClass) -> &'static [(KeyDuration, u64)] {
    match class {
        KeyClass::Vip => VIP_PRICES,
        KeyClass::Free => FREE_PRICES,
    }
}

/// Returns the cheapest tier of a class, charged for unlisted durations.
#[must_use]
pub fn fallback_price(class: KeyClass) -> u64 {
    price_table(class)
        .iter()
        .map(|(_, cost)| *cost)
        .min()
        .unwrap_or(1)
}

/// Returns the points cost of a key. Always positive.
#[must_use]
pub fn price_of(class: KeyClass, duration: KeyDuration) -> u64 {
    price_table(class)
        .iter()
        .find(|(listed, _)| *listed == duration)
        .map_or_else(|| fallback_price(class), |(_, cost)| *cost)
}
