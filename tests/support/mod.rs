#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use yieldsweep::application::Rebalancer;
use yieldsweep::domain::{Product, TierRate};
use yieldsweep::testkit::exchange::MockExchange;
use yieldsweep::testkit::notifier::RecordingNotifier;
use yieldsweep::testkit::settings::settings;

/// Config with three stablecoins and pacing disabled.
pub const VALID_CONFIG: &str = r#"
[allocation]
tracked_currencies = ["USDT", "FDUSD", "USDC"]
base_currency = "USDT"
min_subscription = "0.1"
min_notional = "5"
call_delay_ms = 0

[exchange]
api_url = "https://api.binance.com"

[logging]
level = "warn"
"#;

pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

/// Untiered A product at 5% and B product at 5% with a `100-200A` +1% tier.
pub fn abc_catalog(exchange: MockExchange) -> MockExchange {
    exchange
        .with_flexible(Product::flexible("A001", "A".into(), dec!(0.05)))
        .with_flexible(
            Product::flexible("B001", "B".into(), dec!(0.05))
                .with_tiers(vec![TierRate::new("100-200A", Some(dec!(0.01)))]),
        )
}

pub fn abc_rebalancer(exchange: &Arc<MockExchange>, notifier: &RecordingNotifier) -> Rebalancer {
    Rebalancer::new(
        exchange.clone(),
        settings(&["A", "B", "C"], "A"),
        Arc::new(notifier.clone()),
    )
}

pub fn a_pool(amount: Decimal) -> MockExchange {
    MockExchange::new().with_spot("A", amount)
}
