//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; API credentials come only from
//! the `BINANCE_API_KEY` and `BINANCE_API_SECRET` environment variables.
//!
//! # Example
//!
//! ```no_run
//! use yieldsweep::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::allocation::AllocationConfig;
use super::logging::LoggingConfig;
use crate::adapter::outbound::binance::{BinanceConfig, BinanceCredentials};
use crate::application::RebalanceSettings;
use crate::domain::error::DomainError;
use crate::domain::{Currency, CurrencySet};
use crate::error::{ConfigError, Result};

const API_KEY_VAR: &str = "BINANCE_API_KEY";
const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Tracked currencies and allocation thresholds.
    #[serde(default)]
    pub allocation: AllocationConfig,

    /// Exchange endpoint and transport settings.
    #[serde(default)]
    pub exchange: BinanceConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Credentials picked up from the environment at load time.
    #[serde(skip)]
    pub credentials: Option<BinanceCredentials>,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Credentials are never read from the config file.
        config.credentials = credentials_from_env();

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Credentials for signed requests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first unset variable.
    pub fn require_credentials(&self) -> Result<BinanceCredentials> {
        match &self.credentials {
            Some(credentials) => Ok(credentials.clone()),
            None if std::env::var(API_KEY_VAR).is_err() => {
                Err(ConfigError::MissingField { field: API_KEY_VAR }.into())
            }
            None => Err(ConfigError::MissingField {
                field: API_SECRET_VAR,
            }
            .into()),
        }
    }

    /// The validated tracked set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, repeats a currency, or does not
    /// contain the base currency.
    pub fn currency_set(&self) -> Result<CurrencySet> {
        let tracked = self
            .allocation
            .tracked_currencies
            .iter()
            .map(Currency::new)
            .collect();
        let base = Currency::new(&self.allocation.base_currency);

        CurrencySet::try_new(tracked, base).map_err(|err| {
            let field = match err {
                DomainError::BaseNotTracked { .. } => "allocation.base_currency",
                _ => "allocation.tracked_currencies",
            };
            ConfigError::InvalidValue {
                field,
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Runtime settings for the rebalancing services.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracked set is invalid.
    pub fn rebalance_settings(&self) -> Result<RebalanceSettings> {
        let allocation = &self.allocation;
        Ok(RebalanceSettings {
            currencies: self.currency_set()?,
            min_subscription: allocation.min_subscription,
            min_notional: allocation.min_notional,
            call_delay: Duration::from_millis(allocation.call_delay_ms),
            default_product_suffix: allocation.default_product_suffix.clone(),
            include_locked: allocation.include_locked,
        })
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.currency_set()?;

        let allocation = &self.allocation;
        if allocation.min_subscription < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "allocation.min_subscription",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if allocation.min_notional < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "allocation.min_notional",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if allocation.default_product_suffix.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "allocation.default_product_suffix",
            }
            .into());
        }

        if self.exchange.api_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "exchange.api_url",
            }
            .into());
        }
        url::Url::parse(&self.exchange.api_url).map_err(|err| ConfigError::InvalidValue {
            field: "exchange.api_url",
            reason: err.to_string(),
        })?;
        if self.exchange.recv_window_ms == 0 || self.exchange.recv_window_ms > 60_000 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.recv_window_ms",
                reason: "must be between 1 and 60000".to_string(),
            }
            .into());
        }
        if self.exchange.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "exchange.http.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

fn credentials_from_env() -> Option<BinanceCredentials> {
    let api_key = std::env::var(API_KEY_VAR).ok().filter(|v| !v.is_empty())?;
    let api_secret = std::env::var(API_SECRET_VAR)
        .ok()
        .filter(|v| !v.is_empty())?;
    Some(BinanceCredentials {
        api_key,
        api_secret,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        let settings = config.rebalance_settings().unwrap();

        assert_eq!(settings.currencies.len(), 3);
        assert_eq!(settings.currencies.base().as_str(), "USDT");
        assert_eq!(settings.min_subscription, dec!(0.1));
        assert_eq!(settings.min_notional, dec!(5));
        assert_eq!(settings.call_delay, Duration::from_secs(3));
        assert_eq!(settings.default_product_suffix, "001");
        assert!(!settings.include_locked);
        assert_eq!(config.exchange.api_url, "https://api.binance.com");
    }

    #[test]
    fn base_currency_must_be_tracked() {
        let err = Config::parse_toml(
            r#"
            [allocation]
            tracked_currencies = ["USDT", "FDUSD"]
            base_currency = "USDC"
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "allocation.base_currency",
                ..
            })
        ));
    }

    #[test]
    fn duplicate_currencies_are_rejected_case_insensitively() {
        let err = Config::parse_toml(
            r#"
            [allocation]
            tracked_currencies = ["USDT", "usdt"]
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "allocation.tracked_currencies",
                ..
            })
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = Config::parse_toml(
            r#"
            [allocation]
            min_notional = "-1"
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "allocation.min_notional",
                ..
            })
        ));
    }

    #[test]
    fn malformed_api_url_is_rejected() {
        let err = Config::parse_toml(
            r#"
            [exchange]
            api_url = "not a url"
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "exchange.api_url",
                ..
            })
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("[allocation\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
