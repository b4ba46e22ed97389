//! Settlement and currency conversion.
//!
//! Before planning, savings positions are redeemed, funding balances are
//! moved into spot, and every non-base currency above the minimum notional
//! is sold into the base currency. During planning the same helper buys
//! non-base currencies just in time.

use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use super::pacing::Pacer;
use super::settings::RebalanceSettings;
use crate::domain::{Action, Currency};
use crate::error::Result;
use crate::port::{EarnExchange, Event, MarketOrder, Notifier, OrderAmount};

/// Consolidates holdings into the base currency and performs conversions.
#[derive(Clone)]
pub struct Settlement {
    exchange: Arc<dyn EarnExchange>,
    settings: Arc<RebalanceSettings>,
    notifier: Arc<dyn Notifier>,
    pacer: Pacer,
}

impl Settlement {
    /// Create a settlement helper.
    pub fn new(
        exchange: Arc<dyn EarnExchange>,
        settings: Arc<RebalanceSettings>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let pacer = Pacer::new(settings.call_delay);
        Self {
            exchange,
            settings,
            notifier,
            pacer,
        }
    }

    /// Redeem, transfer and convert so the spendable pool sits in the base
    /// currency of the spot wallet. Returns the side effects in order.
    pub async fn consolidate(&self) -> Result<Vec<Action>> {
        let mut actions = self.redeem_all().await?;
        actions.extend(self.transfer_all().await?);
        actions.extend(self.convert_to_base().await);
        Ok(actions)
    }

    /// Redeem every flexible position of every tracked currency.
    pub async fn redeem_all(&self) -> Result<Vec<Action>> {
        let currencies = &self.settings.currencies;
        let positions = try_join_all(currencies.iter().map(|c| self.exchange.earn_positions(c)))
            .await?
            .into_iter()
            .flatten()
            .filter(|position| position.amount > Decimal::ZERO);

        let mut actions = Vec::new();
        for position in positions {
            self.exchange.redeem(&position).await?;
            self.pacer.pause().await;
            actions.push(self.record(Action::Redeemed {
                product_id: position.product_id,
                currency: position.currency,
                amount: position.amount,
            }));
        }
        Ok(actions)
    }

    /// Move each tracked currency's funding balance into spot.
    pub async fn transfer_all(&self) -> Result<Vec<Action>> {
        let currencies = &self.settings.currencies;
        let balances =
            try_join_all(currencies.iter().map(|c| self.exchange.funding_balance(c))).await?;

        let mut actions = Vec::new();
        for (currency, amount) in currencies.iter().zip(balances) {
            if amount <= Decimal::ZERO {
                continue;
            }
            self.exchange
                .transfer_funding_to_spot(currency, amount)
                .await?;
            actions.push(self.record(Action::Transferred {
                currency: currency.clone(),
                amount,
            }));
        }
        Ok(actions)
    }

    /// Sell every non-base currency into the base.
    ///
    /// Each currency is handled independently: amounts at or below the
    /// minimum notional are skipped, and a failed sale is reported and
    /// ignored so the other currencies still convert.
    pub async fn convert_to_base(&self) -> Vec<Action> {
        let conversions = self
            .settings
            .currencies
            .non_base()
            .map(|currency| self.convert_one(currency));

        join_all(conversions).await.into_iter().flatten().collect()
    }

    async fn convert_one(&self, currency: &Currency) -> Option<Action> {
        let outcome = self.try_convert(currency).await;
        match outcome {
            Ok(action) => action,
            Err(err) => {
                warn!(currency = %currency, error = %err, "Conversion to base failed");
                self.notifier.notify(Event::ConversionFailed {
                    currency: currency.clone(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    async fn try_convert(&self, currency: &Currency) -> Result<Option<Action>> {
        let held = self.exchange.spot_balance(currency).await?;
        let min_notional = self.settings.min_notional;
        if held <= min_notional {
            self.notifier.notify(Event::ConversionSkipped {
                currency: currency.clone(),
                amount: held,
                min_notional,
            });
            return Ok(None);
        }

        // Lot size is one whole unit.
        let quantity = held.round_dp_with_strategy(0, RoundingStrategy::ToZero);
        let order = MarketOrder::sell(
            currency.clone(),
            self.settings.currencies.base().clone(),
            quantity,
        );
        self.execute(&order).await.map(Some)
    }

    /// Buy `currency` with base funds, by exact quantity or by spending a
    /// quote amount.
    pub async fn buy(&self, currency: &Currency, amount: OrderAmount) -> Result<Action> {
        let order = MarketOrder::buy(
            currency.clone(),
            self.settings.currencies.base().clone(),
            amount,
        );
        self.execute(&order).await
    }

    async fn execute(&self, order: &MarketOrder) -> Result<Action> {
        debug!(
            currency = %order.currency,
            side = ?order.side,
            amount = %order.amount,
            "Placing market order"
        );
        let fill = self.exchange.place_market_order(order).await?;
        Ok(self.record(Action::Converted {
            currency: order.currency.clone(),
            side: order.side,
            quantity: fill.executed_quantity,
            quote_amount: fill.quote_amount,
        }))
    }

    fn record(&self, action: Action) -> Action {
        self.notifier.notify(Event::ActionExecuted(action.clone()));
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::exchange::{Call, MockExchange};
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::settings::settings;
    use rust_decimal_macros::dec;

    fn settlement(exchange: &Arc<MockExchange>, notifier: &RecordingNotifier) -> Settlement {
        Settlement::new(
            exchange.clone(),
            Arc::new(settings(&["USDT", "FDUSD", "USDC"], "USDT")),
            Arc::new(notifier.clone()),
        )
    }

    #[tokio::test]
    async fn consolidate_redeems_transfers_and_converts() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_position("FDUSD001", "FDUSD", dec!(40.7))
                .with_funding("USDT", dec!(12))
                .with_spot("USDC", dec!(3)),
        );
        let notifier = RecordingNotifier::new();

        let actions = settlement(&exchange, &notifier).consolidate().await.unwrap();

        assert!(matches!(actions[0], Action::Redeemed { .. }));
        // Redemption lands in funding, then everything moves to spot.
        assert_eq!(exchange.funding(&"FDUSD".into()), Decimal::ZERO);
        assert_eq!(exchange.funding(&"USDT".into()), Decimal::ZERO);
        // 40.7 FDUSD floors to 40 sold; the fraction stays behind.
        assert_eq!(exchange.spot(&"FDUSD".into()), dec!(0.7));
        assert_eq!(exchange.spot(&"USDT".into()), dec!(52));
        // 3 USDC is below the 5 minimum notional and is left alone.
        assert_eq!(exchange.spot(&"USDC".into()), dec!(3));
        assert!(notifier
            .events()
            .iter()
            .any(|e| matches!(e, Event::ConversionSkipped { currency, .. } if currency.as_str() == "USDC")));
    }

    #[tokio::test]
    async fn failed_conversion_does_not_stop_others() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_spot("FDUSD", dec!(20))
                .with_spot("USDC", dec!(30))
                .fail_orders_for("FDUSD", "Filter failure: LOT_SIZE"),
        );
        let notifier = RecordingNotifier::new();

        let actions = settlement(&exchange, &notifier).convert_to_base().await;

        assert_eq!(actions.len(), 1);
        assert_eq!(exchange.spot(&"FDUSD".into()), dec!(20));
        assert_eq!(exchange.spot(&"USDT".into()), dec!(30));
        assert!(notifier
            .events()
            .iter()
            .any(|e| matches!(e, Event::ConversionFailed { .. })));
    }

    #[tokio::test]
    async fn base_currency_is_never_sold() {
        let exchange = Arc::new(MockExchange::new().with_spot("USDT", dec!(500)));
        let notifier = RecordingNotifier::new();

        settlement(&exchange, &notifier).convert_to_base().await;

        assert!(exchange
            .calls()
            .iter()
            .all(|call| !matches!(call, Call::MarketOrder(_))));
    }

    #[tokio::test]
    async fn amount_equal_to_min_notional_is_skipped() {
        let exchange = Arc::new(MockExchange::new().with_spot("FDUSD", dec!(5)));
        let notifier = RecordingNotifier::new();

        let actions = settlement(&exchange, &notifier).convert_to_base().await;

        assert!(actions.is_empty());
        assert_eq!(exchange.spot(&"FDUSD".into()), dec!(5));
    }
}
