//! Balance aggregation across sub-accounts.
//!
//! For every tracked currency the funding, spot and earn balances are
//! queried concurrently and reduced into a single [`BalanceSnapshot`].

use std::sync::Arc;

use futures_util::future::try_join_all;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{BalanceSnapshot, Currency, CurrencyBalance, CurrencySet};
use crate::error::Result;
use crate::port::{BalancesEvent, EarnExchange, Event, Notifier};

/// Collects per-account balances for the tracked currencies.
pub struct BalanceAggregator {
    exchange: Arc<dyn EarnExchange>,
    notifier: Arc<dyn Notifier>,
}

impl BalanceAggregator {
    /// Create an aggregator over the given exchange.
    pub fn new(exchange: Arc<dyn EarnExchange>, notifier: Arc<dyn Notifier>) -> Self {
        Self { exchange, notifier }
    }

    /// Query every sub-account for every tracked currency and consolidate.
    ///
    /// Queries are independent and run concurrently; the first remote
    /// failure aborts the aggregation.
    pub async fn aggregate(&self, currencies: &CurrencySet) -> Result<BalanceSnapshot> {
        let balances = try_join_all(currencies.iter().map(|c| self.currency_balance(c))).await?;

        let mut snapshot = BalanceSnapshot::new();
        for (currency, balance) in currencies.iter().zip(balances) {
            snapshot.insert(currency.clone(), balance);
        }

        let total: Decimal = snapshot.available_pool().total();
        self.notifier
            .notify(Event::BalancesAggregated(BalancesEvent {
                currencies: currencies.len(),
                total,
            }));

        Ok(snapshot)
    }

    async fn currency_balance(&self, currency: &Currency) -> Result<CurrencyBalance> {
        let (funding, spot, positions) = tokio::try_join!(
            self.exchange.funding_balance(currency),
            self.exchange.spot_balance(currency),
            self.exchange.earn_positions(currency),
        )?;

        let earn = positions.iter().map(|p| p.amount).sum();
        debug!(
            currency = %currency,
            funding = %funding,
            spot = %spot,
            earn = %earn,
            "Collected balances"
        );

        Ok(CurrencyBalance {
            funding: funding.max(Decimal::ZERO),
            spot: spot.max(Decimal::ZERO),
            earn,
        })
    }
}
