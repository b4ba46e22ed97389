//! Runtime settings shared by the rebalancing services.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::CurrencySet;

/// Validated, fixed parameters of a rebalancing run.
#[derive(Debug, Clone)]
pub struct RebalanceSettings {
    /// Tracked currencies and the base currency.
    pub currencies: CurrencySet,
    /// Smallest residual balance the sweep subscribes.
    pub min_subscription: Decimal,
    /// Holdings must exceed this before they are converted to the base.
    pub min_notional: Decimal,
    /// Pause after every subscription or redemption call.
    pub call_delay: Duration,
    /// Suffix forming the fallback product id (`USDT` + `001`).
    pub default_product_suffix: String,
    /// Whether locked products participate unless the request overrides it.
    pub include_locked: bool,
}
