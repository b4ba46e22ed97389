//! Currency identifiers and the closed set of tracked currencies.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Currency code - newtype for type safety.
///
/// Codes are normalized to upper case on construction so `usdt` and `USDT`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new `Currency` from a code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_uppercase())
    }

    /// Get the currency code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The fixed set of equivalent-value currencies the system rebalances among,
/// with one of them designated as the settlement (base) currency.
///
/// The set is closed: it is built once from configuration and never grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencySet {
    tracked: Vec<Currency>,
    base: Currency,
}

impl CurrencySet {
    /// Build a tracked set, validating that it is non-empty, free of
    /// duplicates, and contains the base currency.
    pub fn try_new(tracked: Vec<Currency>, base: Currency) -> Result<Self, DomainError> {
        if tracked.is_empty() {
            return Err(DomainError::EmptyCurrencySet);
        }
        for (i, currency) in tracked.iter().enumerate() {
            if tracked[..i].contains(currency) {
                return Err(DomainError::DuplicateCurrency {
                    currency: currency.to_string(),
                });
            }
        }
        if !tracked.contains(&base) {
            return Err(DomainError::BaseNotTracked {
                base: base.to_string(),
            });
        }
        Ok(Self { tracked, base })
    }

    /// The settlement currency.
    #[must_use]
    pub const fn base(&self) -> &Currency {
        &self.base
    }

    /// True if the currency belongs to the set.
    #[must_use]
    pub fn contains(&self, currency: &Currency) -> bool {
        self.tracked.contains(currency)
    }

    /// Look up a tracked currency by its code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&Currency> {
        self.tracked
            .iter()
            .find(|currency| currency.as_str().eq_ignore_ascii_case(code))
    }

    /// Iterate over all tracked currencies in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.tracked.iter()
    }

    /// Iterate over tracked currencies other than the base.
    pub fn non_base(&self) -> impl Iterator<Item = &Currency> {
        self.tracked.iter().filter(move |c| **c != self.base)
    }

    /// Number of tracked currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Always false for a validated set; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}
