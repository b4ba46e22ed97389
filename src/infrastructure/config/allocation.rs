//! Allocation parameters.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Which currencies take part in a run and the thresholds applied to them.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationConfig {
    /// Currencies whose balances are consolidated and allocated.
    #[serde(default = "default_tracked_currencies")]
    pub tracked_currencies: Vec<String>,
    /// Settlement currency; must be one of the tracked currencies.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Smallest residual the sweep subscribes.
    #[serde(default = "default_min_subscription")]
    pub min_subscription: Decimal,
    /// Holdings must exceed this before they are converted to the base.
    #[serde(default = "default_min_notional")]
    pub min_notional: Decimal,
    /// Pause after every subscription and redemption, in milliseconds.
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,
    /// Suffix forming each currency's fallback flexible product id.
    #[serde(default = "default_product_suffix")]
    pub default_product_suffix: String,
    /// Consider locked products unless overridden on the command line.
    #[serde(default)]
    pub include_locked: bool,
}

fn default_tracked_currencies() -> Vec<String> {
    vec!["USDT".into(), "FDUSD".into(), "USDC".into()]
}

fn default_base_currency() -> String {
    "USDT".into()
}

fn default_min_subscription() -> Decimal {
    Decimal::new(1, 1)
}

fn default_min_notional() -> Decimal {
    Decimal::from(5)
}

const fn default_call_delay_ms() -> u64 {
    3000
}

fn default_product_suffix() -> String {
    "001".into()
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            tracked_currencies: default_tracked_currencies(),
            base_currency: default_base_currency(),
            min_subscription: default_min_subscription(),
            min_notional: default_min_notional(),
            call_delay_ms: default_call_delay_ms(),
            default_product_suffix: default_product_suffix(),
            include_locked: false,
        }
    }
}
