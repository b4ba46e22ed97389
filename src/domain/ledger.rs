//! The spendable base-currency pool threaded through planning.

use rust_decimal::Decimal;

use super::currency::Currency;

/// Live base-currency funds available to the planner.
///
/// Each planning decision takes the ledger by value and hands back the
/// updated one, so the dependency between successive steps is explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    base: Currency,
    available: Decimal,
}

impl Ledger {
    /// Create a ledger; negative readings are clamped to zero.
    #[must_use]
    pub fn new(base: Currency, available: Decimal) -> Self {
        Self {
            base,
            available: available.max(Decimal::ZERO),
        }
    }

    /// The settlement currency.
    #[must_use]
    pub const fn base(&self) -> &Currency {
        &self.base
    }

    /// Funds currently available.
    #[must_use]
    pub const fn available(&self) -> Decimal {
        self.available
    }

    /// True when nothing is left to allocate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.available <= Decimal::ZERO
    }

    /// Ledger after a fresh balance reading.
    #[must_use]
    pub fn observed(self, available: Decimal) -> Self {
        Self::new(self.base, available)
    }

    /// Ledger after spending `amount`, never dropping below zero.
    #[must_use]
    pub fn spend(self, amount: Decimal) -> Self {
        let available = self.available - amount;
        Self::new(self.base, available)
    }

    /// The largest amount that can be taken towards `wanted`.
    #[must_use]
    pub fn cap(&self, wanted: Decimal) -> Decimal {
        wanted.min(self.available).max(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn spending_never_goes_negative() {
        let ledger = Ledger::new("USDT".into(), dec!(50));
        let ledger = ledger.spend(dec!(80));
        assert_eq!(ledger.available(), Decimal::ZERO);
        assert!(ledger.is_empty());
    }

    #[test]
    fn cap_limits_to_available() {
        let ledger = Ledger::new("USDT".into(), dec!(50));
        assert_eq!(ledger.cap(dec!(100)), dec!(50));
        assert_eq!(ledger.cap(dec!(20)), dec!(20));
    }

    #[test]
    fn observed_replaces_reading() {
        let ledger = Ledger::new("USDT".into(), dec!(50)).observed(dec!(-3));
        assert_eq!(ledger.available(), Decimal::ZERO);
        let ledger = ledger.observed(dec!(12.5));
        assert_eq!(ledger.available(), dec!(12.5));
    }
}
