//! Wallet balances per custodial sub-account and the consolidated pool.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::currency::Currency;
use super::error::DomainError;

/// Custodial sub-accounts holding funds on the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    /// Funding wallet.
    Funding,
    /// Spot trading wallet.
    Spot,
    /// Savings (simple earn) positions.
    Earn,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funding => write!(f, "funding"),
            Self::Spot => write!(f, "spot"),
            Self::Earn => write!(f, "earn"),
        }
    }
}

/// Non-negative amount per currency.
///
/// Currencies that were never set read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WalletBalance {
    amounts: BTreeMap<Currency, Decimal>,
}

impl WalletBalance {
    /// Create an empty balance map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount held in the given currency, zero if absent.
    #[must_use]
    pub fn get(&self, currency: &Currency) -> Decimal {
        self.amounts.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Set the amount for a currency, rejecting negative values.
    pub fn set(&mut self, currency: Currency, amount: Decimal) -> Result<(), DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeAmount {
                currency: currency.to_string(),
                amount,
            });
        }
        self.amounts.insert(currency, amount);
        Ok(())
    }

    /// Iterate over `(currency, amount)` pairs in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, Decimal)> {
        self.amounts.iter().map(|(c, a)| (c, *a))
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.amounts.values().copied().sum()
    }
}

/// One currency's holdings across the three sub-accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyBalance {
    /// Free balance in the funding wallet.
    pub funding: Decimal,
    /// Free balance in the spot wallet.
    pub spot: Decimal,
    /// Total position held in savings products.
    pub earn: Decimal,
}

impl CurrencyBalance {
    /// Consolidated spendable amount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.funding + self.spot + self.earn
    }

    /// Amount in a specific sub-account.
    #[must_use]
    pub const fn account(&self, account: Account) -> Decimal {
        match account {
            Account::Funding => self.funding,
            Account::Spot => self.spot,
            Account::Earn => self.earn,
        }
    }
}

impl Serialize for CurrencyBalance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CurrencyBalance", 4)?;
        state.serialize_field("funding", &self.funding)?;
        state.serialize_field("spot", &self.spot)?;
        state.serialize_field("earn", &self.earn)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// Balances for every tracked currency, broken down by sub-account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BalanceSnapshot {
    currencies: BTreeMap<Currency, CurrencyBalance>,
}

impl BalanceSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the breakdown for a currency.
    pub fn insert(&mut self, currency: Currency, balance: CurrencyBalance) {
        self.currencies.insert(currency, balance);
    }

    /// Breakdown for a currency, all zero if absent.
    #[must_use]
    pub fn get(&self, currency: &Currency) -> CurrencyBalance {
        self.currencies.get(currency).copied().unwrap_or_default()
    }

    /// Per-currency view of a single sub-account.
    #[must_use]
    pub fn account(&self, account: Account) -> WalletBalance {
        self.collect(|balance| balance.account(account))
    }

    /// The consolidated spendable pool: funding + spot + earn per currency.
    #[must_use]
    pub fn available_pool(&self) -> WalletBalance {
        self.collect(CurrencyBalance::total)
    }

    /// Iterate over `(currency, breakdown)` pairs in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &CurrencyBalance)> {
        self.currencies.iter()
    }

    fn collect(&self, pick: impl Fn(&CurrencyBalance) -> Decimal) -> WalletBalance {
        WalletBalance {
            amounts: self
                .currencies
                .iter()
                .map(|(currency, balance)| (currency.clone(), pick(balance)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_currency_reads_as_zero() {
        let wallet = WalletBalance::new();
        assert_eq!(wallet.get(&Currency::new("USDT")), Decimal::ZERO);

        let snapshot = BalanceSnapshot::new();
        assert_eq!(snapshot.get(&Currency::new("USDT")).total(), Decimal::ZERO);
    }

    #[test]
    fn wallet_rejects_negative_amounts() {
        let mut wallet = WalletBalance::new();
        let result = wallet.set(Currency::new("USDT"), dec!(-1));
        assert!(matches!(result, Err(DomainError::NegativeAmount { .. })));
        assert!(wallet.set(Currency::new("USDT"), dec!(0)).is_ok());
    }

    #[test]
    fn pool_sums_all_accounts() {
        let mut snapshot = BalanceSnapshot::new();
        snapshot.insert(
            Currency::new("USDT"),
            CurrencyBalance {
                funding: dec!(1.5),
                spot: dec!(2.25),
                earn: dec!(100),
            },
        );
        snapshot.insert(
            Currency::new("FDUSD"),
            CurrencyBalance {
                funding: dec!(0),
                spot: dec!(3),
                earn: dec!(0),
            },
        );

        let pool = snapshot.available_pool();
        assert_eq!(pool.get(&Currency::new("USDT")), dec!(103.75));
        assert_eq!(pool.get(&Currency::new("FDUSD")), dec!(3));
        assert_eq!(pool.total(), dec!(106.75));

        let earn = snapshot.account(Account::Earn);
        assert_eq!(earn.get(&Currency::new("USDT")), dec!(100));
    }

    #[test]
    fn serialized_breakdown_carries_total() {
        let balance = CurrencyBalance {
            funding: dec!(1),
            spot: dec!(2),
            earn: dec!(3.5),
        };
        let json = serde_json::to_value(balance).unwrap();
        assert_eq!(json["total"], "6.5");
        assert_eq!(json["earn"], "3.5");
    }
}
