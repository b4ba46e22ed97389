//! Composition root: wires the Binance adapter, notifiers and application
//! services from a loaded [`Config`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::binance::{BinanceClient, BinanceExchange};
use crate::application::Rebalancer;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{EarnExchange, LogNotifier, Notifier, NotifierRegistry};

/// Build the notifier registry. Events are always mirrored to the log.
pub(crate) fn build_notifier_registry() -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry
}

/// Build the exchange adapter from configuration and environment credentials.
///
/// # Errors
///
/// Returns an error when `BINANCE_API_KEY` or `BINANCE_API_SECRET` is unset.
pub fn build_exchange(config: &Config) -> Result<Arc<dyn EarnExchange>> {
    let credentials = config.require_credentials()?;
    let client = BinanceClient::from_config(&config.exchange, credentials);
    info!(api_url = %config.exchange.api_url, "Exchange client ready");
    Ok(Arc::new(BinanceExchange::new(client)))
}

/// Build a rebalancer over an existing exchange connection.
///
/// # Errors
///
/// Returns an error if the allocation settings are invalid.
pub fn build_rebalancer_with(
    config: &Config,
    exchange: Arc<dyn EarnExchange>,
    notifier: Arc<dyn Notifier>,
) -> Result<Rebalancer> {
    let settings = config.rebalance_settings()?;
    info!(
        exchange = exchange.exchange_name(),
        currencies = settings.currencies.len(),
        base = %settings.currencies.base(),
        "Rebalancer configured"
    );
    Ok(Rebalancer::new(exchange, settings, notifier))
}

/// Build a rebalancer against the live exchange.
///
/// # Errors
///
/// Returns an error if credentials are missing or settings are invalid.
pub fn build_rebalancer(config: &Config) -> Result<Rebalancer> {
    let exchange = build_exchange(config)?;
    build_rebalancer_with(config, exchange, Arc::new(build_notifier_registry()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::exchange::MockExchange;

    #[test]
    fn registry_always_logs() {
        assert_eq!(build_notifier_registry().len(), 1);
    }

    #[test]
    fn rebalancer_builds_over_any_exchange() {
        let config = Config::parse_toml("").unwrap();
        let exchange: Arc<dyn EarnExchange> = Arc::new(MockExchange::new());
        assert!(
            build_rebalancer_with(&config, exchange, Arc::new(build_notifier_registry())).is_ok()
        );
    }
}
