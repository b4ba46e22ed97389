//! Residual sweep into default flexible products.
//!
//! After planning, any tracked currency still holding at least the minimum
//! subscription amount is placed into its fallback product (`<CODE><suffix>`),
//! whether or not the planner halted early.

use std::sync::Arc;

use futures_util::future::try_join_all;
use rust_decimal::Decimal;

use super::pacing::Pacer;
use super::settings::RebalanceSettings;
use crate::domain::{Action, ProductId, ProductKind, ProductRef};
use crate::error::Result;
use crate::port::{EarnExchange, Event, Notifier};

/// Subscribes leftover balances to each currency's default product.
pub struct Sweep {
    exchange: Arc<dyn EarnExchange>,
    settings: Arc<RebalanceSettings>,
    notifier: Arc<dyn Notifier>,
    pacer: Pacer,
}

impl Sweep {
    /// Create a sweep.
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

    /// Re-read balances and subscribe every residual at or above the
    /// minimum subscription amount. Subscription failures abort the sweep.
    pub async fn run(&self) -> Result<Vec<Action>> {
        let currencies = &self.settings.currencies;
        let balances =
            try_join_all(currencies.iter().map(|c| self.exchange.spot_balance(c))).await?;

        let mut actions = Vec::new();
        for (currency, amount) in currencies.iter().zip(balances) {
            if amount < self.settings.min_subscription || amount <= Decimal::ZERO {
                continue;
            }

            let product = ProductRef {
                id: ProductId::default_for(currency, &self.settings.default_product_suffix),
                kind: ProductKind::Flexible,
                currency: currency.clone(),
            };
            self.exchange.subscribe(&product, amount).await?;
            self.pacer.pause().await;

            let action = Action::Subscribed {
                product_id: product.id,
                currency: currency.clone(),
                amount,
            };
            self.notifier.notify(Event::ActionExecuted(action.clone()));
            actions.push(action);
        }

        self.notifier.notify(Event::SweepFinished {
            subscriptions: actions.len(),
        });
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::NullNotifier;
    use crate::testkit::exchange::MockExchange;
    use crate::testkit::settings::settings;
    use rust_decimal_macros::dec;

    fn sweep(exchange: &Arc<MockExchange>) -> Sweep {
        Sweep::new(
            exchange.clone(),
            Arc::new(settings(&["USDT", "FDUSD", "USDC"], "USDT")),
            Arc::new(NullNotifier),
        )
    }

    #[tokio::test]
    async fn subscribes_residuals_to_default_products() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_spot("USDT", dec!(0.1))
                .with_spot("FDUSD", dec!(0.7))
                .with_spot("USDC", dec!(0.09)),
        );

        let actions = sweep(&exchange).run().await.unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(exchange.subscribed_to("USDT001"), dec!(0.1));
        assert_eq!(exchange.subscribed_to("FDUSD001"), dec!(0.7));
        assert_eq!(exchange.subscribed_to("USDC001"), Decimal::ZERO);
    }

    #[tokio::test]
    async fn second_sweep_subscribes_nothing() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_spot("USDT", dec!(12))
                .with_spot("USDC", dec!(0.5)),
        );
        let sweep = sweep(&exchange);

        assert_eq!(sweep.run().await.unwrap().len(), 2);
        assert!(sweep.run().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscription_failure_propagates() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_spot("USDT", dec!(12))
                .fail_subscriptions("Product does not exist"),
        );

        assert!(sweep(&exchange).run().await.is_err());
    }
}
