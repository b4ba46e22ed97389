//! Canonical test settings.
//!
//! Single source of truth for rebalancing parameters used across tests.
//! Call pacing is disabled so tests never wait.

use std::time::Duration;

use rust_decimal_macros::dec;

use crate::application::RebalanceSettings;
use crate::domain::{Currency, CurrencySet};

/// Build a currency set, panicking on invalid input.
pub fn currencies(tracked: &[&str], base: &str) -> CurrencySet {
    CurrencySet::try_new(
        tracked.iter().map(|code| Currency::new(*code)).collect(),
        Currency::new(base),
    )
    .expect("valid test currency set")
}

/// Default settings over the given currencies: minimum subscription 0.1,
/// minimum notional 5, suffix `001`, locked products excluded.
pub fn settings(tracked: &[&str], base: &str) -> RebalanceSettings {
    RebalanceSettings {
        currencies: currencies(tracked, base),
        min_subscription: dec!(0.1),
        min_notional: dec!(5),
        call_delay: Duration::ZERO,
        default_product_suffix: "001".to_string(),
        include_locked: false,
    }
}
