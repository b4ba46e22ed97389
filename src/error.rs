use thiserror::Error;

use crate::domain::error::DomainError;

/// Marker the exchange puts in rejection messages when an account cannot
/// cover the requested action.
const INSUFFICIENT_BALANCE_MARKER: &str = "insufficient balance";

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by, or while talking to, the exchange.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("exchange rejected request (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("insufficient balance for {currency}: need {required}, have {available}")]
    InsufficientBalance {
        currency: String,
        required: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// True when the failure means the account could not cover the request.
    ///
    /// Matches the typed variant as well as raw exchange rejections whose
    /// message carries the insufficient-balance marker. The rejection code
    /// alone is not enough: `-2010` covers every rejected new order.
    #[must_use]
    pub fn is_insufficient_balance(&self) -> bool {
        match self {
            Self::Exchange(ExchangeError::InsufficientBalance { .. }) => true,
            Self::Exchange(ExchangeError::Api { message, .. }) => message
                .to_ascii_lowercase()
                .contains(INSUFFICIENT_BALANCE_MARKER),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn typed_insufficient_balance_is_recognised() {
        let err: Error = ExchangeError::InsufficientBalance {
            currency: "USDT".into(),
            required: dec!(100),
            available: dec!(50),
        }
        .into();
        assert!(err.is_insufficient_balance());
    }

    #[test]
    fn api_rejection_with_marker_is_recognised() {
        let err: Error = ExchangeError::Api {
            code: -1013,
            message: "Account has Insufficient Balance for requested action.".into(),
        }
        .into();
        assert!(err.is_insufficient_balance());
    }

    #[test]
    fn rejected_order_without_marker_is_not_insufficient_balance() {
        let err: Error = ExchangeError::Api {
            code: -2010,
            message: "Market is closed.".into(),
        }
        .into();
        assert!(!err.is_insufficient_balance());
    }

    #[test]
    fn other_rejections_are_not_insufficient_balance() {
        let err: Error = ExchangeError::Api {
            code: -1021,
            message: "Timestamp for this request is outside of the recvWindow.".into(),
        }
        .into();
        assert!(!err.is_insufficient_balance());

        let err: Error = ExchangeError::AuthFailed("bad key".into()).into();
        assert!(!err.is_insufficient_balance());
    }
}
