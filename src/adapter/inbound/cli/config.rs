//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Load a config file and start logging, honoring `-q` / `-v`.
pub fn load(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    let level = output::OutputConfig::new(output::is_json(), output::is_quiet(), output::verbosity())
        .log_level();
    match level {
        Some(level) => config.logging.with_level(level).init(),
        None => config.init_logging(),
    }
    Ok(config)
}

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;

    if output::is_json() {
        output::json_output(&json!({
            "success": true,
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note("2. Set BINANCE_API_KEY and BINANCE_API_SECRET");
    output::note(&format!("3. Run: yieldsweep plan -c {}", path.display()));
    output::note(&format!("4. Run: yieldsweep run -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let allocation = &config.allocation;

    if output::is_json() {
        output::json_output(&json!({
            "success": true,
            "allocation": {
                "tracked_currencies": allocation.tracked_currencies,
                "base_currency": allocation.base_currency,
                "min_subscription": allocation.min_subscription,
                "min_notional": allocation.min_notional,
                "call_delay_ms": allocation.call_delay_ms,
                "default_product_suffix": allocation.default_product_suffix,
                "include_locked": allocation.include_locked,
            },
            "exchange": {
                "api_url": config.exchange.api_url,
                "recv_window_ms": config.exchange.recv_window_ms,
                "credentials_loaded": config.credentials.is_some(),
            },
        }));
        return Ok(());
    }

    output::section("Allocation");
    output::field("Currencies", allocation.tracked_currencies.join(", "));
    output::field("Base", &allocation.base_currency);
    output::field("Min subscribe", allocation.min_subscription);
    output::field("Min notional", allocation.min_notional);
    output::field("Call delay", format!("{}ms", allocation.call_delay_ms));
    output::field(
        "Fallback",
        format!("<CODE>{}", allocation.default_product_suffix),
    );
    output::field(
        "Locked",
        if allocation.include_locked {
            "included"
        } else {
            "excluded"
        },
    );

    output::section("Exchange");
    output::field("API", &config.exchange.api_url);
    output::field("Recv window", format!("{}ms", config.exchange.recv_window_ms));
    if config.credentials.is_some() {
        output::success("Credentials loaded from environment");
    } else {
        output::warning("BINANCE_API_KEY / BINANCE_API_SECRET not set");
    }

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;

    if output::is_json() {
        output::json_output(&json!({
            "success": true,
            "path": path.display().to_string(),
        }));
        return Ok(());
    }

    output::section("Config Validation");
    output::field("Path", path.display());
    output::success("Config file is valid");
    output::field(
        "Next",
        format!("yieldsweep config show -c {}", path.display()),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_and_validates() {
        let config = Config::parse_toml(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.allocation.base_currency, "USDT");
        assert_eq!(config.allocation.tracked_currencies.len(), 3);
    }

    #[test]
    fn init_writes_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        execute_init(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);

        assert!(execute_init(&path, false).is_err());
        assert!(execute_init(&path, true).is_ok());
    }

    #[test]
    fn validate_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(execute_validate(&dir.path().join("absent.toml")).is_err());
    }
}
