//! Binance exchange configuration.

use serde::Deserialize;

/// Binance REST endpoint and transport settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Validity window for signed requests in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// HTTP transport settings.
    #[serde(default)]
    pub http: BinanceHttpConfig,
}

fn default_api_url() -> String {
    "https://api.binance.com".into()
}

const fn default_recv_window_ms() -> u64 {
    5000
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            recv_window_ms: default_recv_window_ms(),
            http: BinanceHttpConfig::default(),
        }
    }
}

/// Binance HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    3000
}

impl Default for BinanceHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}

/// API credentials, read from the environment only.
#[derive(Clone)]
pub struct BinanceCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for BinanceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_production() {
        let config = BinanceConfig::default();
        assert_eq!(config.api_url, "https://api.binance.com");
        assert_eq!(config.recv_window_ms, 5000);
        assert_eq!(config.http.timeout_ms, 10_000);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BinanceConfig = toml::from_str(
            r#"
            api_url = "http://localhost:9000"

            [http]
            timeout_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.recv_window_ms, 5000);
        assert_eq!(config.http.timeout_ms, 1500);
        assert_eq!(config.http.connect_timeout_ms, 3000);
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let credentials = BinanceCredentials {
            api_key: "key-123".into(),
            api_secret: "secret-456".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
    }
}
