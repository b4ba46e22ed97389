//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors and other methods
//! that enforce domain invariants on currencies and balances.
//!
//! # Examples
//!
//! ```
//! use yieldsweep::domain::currency::{Currency, CurrencySet};
//! use yieldsweep::domain::error::DomainError;
//!
//! let result = CurrencySet::try_new(
//!     vec![Currency::new("USDT"), Currency::new("FDUSD")],
//!     Currency::new("USDC"),
//! );
//!
//! assert!(matches!(result, Err(DomainError::BaseNotTracked { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The tracked currency set must contain at least one currency.
    #[error("tracked currency set cannot be empty")]
    EmptyCurrencySet,

    /// A currency appears more than once in the tracked set.
    #[error("currency {currency} is listed more than once")]
    DuplicateCurrency {
        /// The repeated currency code.
        currency: String,
    },

    /// The base currency must be one of the tracked currencies.
    #[error("base currency {base} is not a tracked currency")]
    BaseNotTracked {
        /// The configured base currency.
        base: String,
    },

    /// The currency is not part of the tracked set.
    #[error("currency {currency} is not tracked")]
    UnknownCurrency {
        /// The rejected currency code.
        currency: String,
    },

    /// Balances are never negative.
    #[error("amount for {currency} must be non-negative, got {amount}")]
    NegativeAmount {
        /// Currency the amount belongs to.
        currency: String,
        /// The invalid amount.
        amount: rust_decimal::Decimal,
    },
}
