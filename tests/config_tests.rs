mod support;

use std::time::Duration;

use rust_decimal_macros::dec;

use support::{write_config, VALID_CONFIG};
use yieldsweep::error::{ConfigError, Error};
use yieldsweep::infrastructure::config::settings::Config;

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), VALID_CONFIG);

    let config = Config::load(&path).unwrap();
    let settings = config.rebalance_settings().unwrap();

    assert_eq!(settings.currencies.len(), 3);
    assert_eq!(settings.currencies.base().as_str(), "USDT");
    assert_eq!(settings.min_notional, dec!(5));
    assert_eq!(settings.call_delay, Duration::ZERO);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.exchange.http.timeout_ms, 10_000);
}

#[test]
fn config_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    match Config::load(dir.path().join("absent.toml")) {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        Err(err) => panic!("Expected read error, got {err}"),
        Ok(_) => panic!("Expected missing file to be rejected"),
    }
}

#[test]
fn config_rejects_untracked_base() {
    let toml = r#"
[allocation]
tracked_currencies = ["FDUSD", "USDC"]
base_currency = "USDT"
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), toml);

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "allocation.base_currency",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid base currency, got {err}"),
        Ok(_) => panic!("Expected untracked base to be rejected"),
    }
}

#[test]
fn config_rejects_empty_currency_list() {
    let toml = r#"
[allocation]
tracked_currencies = []
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), toml);

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "allocation.tracked_currencies",
            ..
        }))
    ));
}

#[test]
fn config_rejects_out_of_range_recv_window() {
    let toml = r#"
[exchange]
recv_window_ms = 120000
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), toml);

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "exchange.recv_window_ms",
            ..
        }))
    ));
}

#[test]
fn config_rejects_zero_timeout() {
    let toml = r#"
[exchange.http]
timeout_ms = 0
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), toml);

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "exchange.http.timeout_ms",
            ..
        }))
    ));
}

#[test]
fn config_rejects_mistyped_values() {
    let toml = r#"
[allocation]
call_delay_ms = "soon"
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), toml);

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}
