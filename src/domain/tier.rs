//! Tier key parsing.
//!
//! Exchanges publish tiered rates keyed by strings such as `0-200USDT`,
//! meaning the bonus applies to the balance band from 0 to 200 USDT. Keys
//! that do not follow `<lower>-<upper><CURRENCY>` parse as
//! [`TierBounds::Unparseable`]; callers treat those bands as unbounded.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::currency::{Currency, CurrencySet};

/// Pattern for a well-formed tier key.
const TIER_KEY_PATTERN: &str = r"^(\d+)-(\d+)([A-Z]+)$";

fn tier_key_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(TIER_KEY_PATTERN).expect("tier key pattern is valid"))
}

/// Result of parsing a tier key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierBounds {
    /// A well-formed band.
    Bounded {
        /// Inclusive lower bound of the band.
        lower: Decimal,
        /// Upper bound of the band, never below `lower`.
        upper: Decimal,
        /// Currency the bounds are expressed in.
        currency: Currency,
    },
    /// The key does not describe a usable band.
    Unparseable,
}

impl TierBounds {
    /// Parse a raw tier key.
    ///
    /// Inverted bands (`upper < lower`) and bounds too large for a decimal
    /// are reported as [`TierBounds::Unparseable`].
    #[must_use]
    pub fn parse(key: &str) -> Self {
        let Some(captures) = tier_key_regex().captures(key) else {
            return Self::Unparseable;
        };

        let lower = Decimal::from_str(&captures[1]);
        let upper = Decimal::from_str(&captures[2]);
        match (lower, upper) {
            (Ok(lower), Ok(upper)) if upper >= lower => Self::Bounded {
                lower,
                upper,
                currency: Currency::new(&captures[3]),
            },
            _ => Self::Unparseable,
        }
    }

    /// Width of the band when it is bounded in a tracked currency.
    #[must_use]
    pub fn required_amount(&self, tracked: &CurrencySet) -> Option<Decimal> {
        match self {
            Self::Bounded {
                lower,
                upper,
                currency,
            } if tracked.contains(currency) => Some(*upper - *lower),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tracked() -> CurrencySet {
        CurrencySet::try_new(
            vec!["USDT".into(), "FDUSD".into(), "USDC".into()],
            "USDT".into(),
        )
        .unwrap()
    }

    #[test]
    fn parses_well_formed_key() {
        assert_eq!(
            TierBounds::parse("100-200USDT"),
            TierBounds::Bounded {
                lower: dec!(100),
                upper: dec!(200),
                currency: Currency::new("USDT"),
            }
        );
    }

    #[test]
    fn required_amount_is_band_width() {
        let bounds = TierBounds::parse("0-500FDUSD");
        assert_eq!(bounds.required_amount(&tracked()), Some(dec!(500)));
    }

    #[test]
    fn untracked_currency_has_no_required_amount() {
        let bounds = TierBounds::parse("0-5BTC");
        assert!(matches!(bounds, TierBounds::Bounded { .. }));
        assert_eq!(bounds.required_amount(&tracked()), None);
    }

    #[test]
    fn malformed_keys_are_unparseable() {
        for key in [
            "",
            "0-200",
            "0-200usdt",
            "0.5-200USDT",
            "0 - 200USDT",
            "200USDT",
            "-200USDT",
            "0-200USDT ",
        ] {
            assert_eq!(TierBounds::parse(key), TierBounds::Unparseable, "{key:?}");
        }
    }

    #[test]
    fn inverted_band_is_unparseable() {
        assert_eq!(TierBounds::parse("300-200USDT"), TierBounds::Unparseable);
    }

    #[test]
    fn oversized_bound_is_unparseable() {
        let key = format!("0-{}USDT", "9".repeat(40));
        assert_eq!(TierBounds::parse(&key), TierBounds::Unparseable);
    }
}
