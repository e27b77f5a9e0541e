use keyforge_ledger::pricing::{FREE_PRICES, VIP_PRICES, fallback_price, price_of, price_table};
use keyforge_types::{KeyClass, KeyDuration};
use proptest::prelude::*;

fn is_listed(class: KeyClass, duration: KeyDuration) -> bool {
    price_table(class).iter().any(|(listed, _)| *listed == duration)
}

#[test]
fn vip_table() {
    assert_eq!(price_of(KeyClass::Vip, KeyDuration::OneDay), 6);
    assert_eq!(price_of(KeyClass::Vip, KeyDuration::SevenDays), 30);
    assert_eq!(price_of(KeyClass::Vip, KeyDuration::Lifetime), 100);
}

#[test]
fn free_table() {
    assert_eq!(price_of(KeyClass::Free, KeyDuration::OneDay), 3);
    assert_eq!(price_of(KeyClass::Free, KeyDuration::TwoDays), 5);
}

#[test]
fn unlisted_durations_cost_cheapest_tier() {
    assert!(!is_listed(KeyClass::Vip, KeyDuration::TwoDays));
    assert_eq!(price_of(KeyClass::Vip, KeyDuration::TwoDays), 6);
    assert!(!is_listed(KeyClass::Free, KeyDuration::Lifetime));
    assert_eq!(price_of(KeyClass::Free, KeyDuration::Lifetime), 3);
    assert_eq!(price_of(KeyClass::Free, KeyDuration::SevenDays), 3);
}

#[test]
fn fallback_is_table_minimum() {
    assert_eq!(fallback_price(KeyClass::Vip), 6);
    assert_eq!(fallback_price(KeyClass::Free), 3);
}

#[test]
fn tables_are_disjoint_by_class() {
    assert_eq!(price_table(KeyClass::Vip), VIP_PRICES);
    assert_eq!(price_table(KeyClass::Free), FREE_PRICES);
    assert_ne!(
        price_of(KeyClass::Vip, KeyDuration::OneDay),
        price_of(KeyClass::Free, KeyDuration::OneDay)
    );
}

proptest! {
    /// Every (class, duration) pair has a positive price and unlisted pairs
    /// cost the class fallback.
    #[test]
    fn pricing_is_total_and_positive(class_idx in 0usize..2, duration_idx in 0usize..4) {
        let class = KeyClass::ALL[class_idx];
        let duration = KeyDuration::ALL[duration_idx];
        let cost = price_of(class, duration);
        prop_assert!(cost > 0);
        if !is_listed(class, duration) {
            prop_assert_eq!(cost, fallback_price(class));
        }
    }
}
