//! Product catalog normalization.
//!
//! Listings are fetched per tracked currency, sold-out entries are dropped,
//! and every surviving product is expanded into allocation steps which are
//! finally ranked by effective yield.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::debug;

use crate::domain::{expand_product, rank_steps, AllocationStep, Currency, CurrencySet, Product};
use crate::error::Result;
use crate::port::{EarnExchange, Event, Notifier};

/// Fetches product listings and turns them into ranked allocation steps.
pub struct CatalogNormalizer {
    exchange: Arc<dyn EarnExchange>,
    notifier: Arc<dyn Notifier>,
}

impl CatalogNormalizer {
    /// Create a normalizer over the given exchange.
    pub fn new(exchange: Arc<dyn EarnExchange>, notifier: Arc<dyn Notifier>) -> Self {
        Self { exchange, notifier }
    }

    /// Fetch listings for every tracked currency.
    ///
    /// Flexible listings always participate; locked listings only when
    /// `include_locked` is set. Results keep currency order, flexible first.
    pub async fn fetch(
        &self,
        currencies: &CurrencySet,
        include_locked: bool,
    ) -> Result<Vec<Product>> {
        let listings =
            try_join_all(currencies.iter().map(|c| self.listings(c, include_locked))).await?;
        Ok(listings.into_iter().flatten().collect())
    }

    /// Fetch and normalize in one go.
    pub async fn ranked_steps(
        &self,
        currencies: &CurrencySet,
        include_locked: bool,
    ) -> Result<Vec<AllocationStep>> {
        let products = self.fetch(currencies, include_locked).await?;
        let available = products.iter().filter(|p| !p.is_sold_out()).count();
        let steps = normalize(&products, currencies);

        self.notifier.notify(Event::CatalogNormalized {
            products: available,
            steps: steps.len(),
        });

        Ok(steps)
    }

    async fn listings(&self, currency: &Currency, include_locked: bool) -> Result<Vec<Product>> {
        let mut products = self.exchange.flexible_products(currency).await?;
        if include_locked {
            products.extend(self.exchange.locked_products(currency).await?);
        }
        debug!(currency = %currency, count = products.len(), "Fetched product listings");
        Ok(products)
    }
}

/// Drop sold-out products, expand the rest and rank the resulting steps.
#[must_use]
pub fn normalize(products: &[Product], currencies: &CurrencySet) -> Vec<AllocationStep> {
    let steps = products
        .iter()
        .filter(|product| !product.is_sold_out())
        .flat_map(|product| expand_product(product, currencies))
        .collect();
    rank_steps(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductDetail, ProductKind, TierRate};
    use crate::port::NullNotifier;
    use crate::testkit::exchange::MockExchange;
    use crate::testkit::settings::currencies;
    use rust_decimal_macros::dec;

    fn locked(id: &str, currency: &str, apr: rust_decimal::Decimal, sold_out: bool) -> Product {
        Product {
            kind: ProductKind::Locked,
            detail: Some(ProductDetail {
                sold_out,
                duration_days: Some(30),
            }),
            ..Product::flexible(id, currency.into(), apr)
        }
    }

    #[test]
    fn sold_out_products_are_dropped() {
        let mut sold = Product::flexible("FDUSD001", "FDUSD".into(), dec!(0.2));
        sold.sold_out = true;
        let products = vec![
            sold,
            locked("FDUSD-30D", "FDUSD", dec!(0.3), true),
            Product::flexible("USDT001", "USDT".into(), dec!(0.05)),
        ];

        let steps = normalize(&products, &currencies(&["USDT", "FDUSD"], "USDT"));

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].product.id.as_str(), "USDT001");
    }

    #[test]
    fn tier_step_outranks_base_step() {
        let set = currencies(&["A", "B", "C"], "A");
        let products = vec![
            Product::flexible("A001", "A".into(), dec!(0.05)),
            Product::flexible("B001", "B".into(), dec!(0.05))
                .with_tiers(vec![TierRate::new("100-200A", Some(dec!(0.01)))]),
        ];

        let steps = normalize(&products, &set);

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].product.id.as_str(), "B001");
        assert_eq!(steps[0].effective_yield, dec!(0.06));
        assert_eq!(steps[0].required_amount, Some(dec!(100)));
        // Equal 5% yields keep catalog order: A's base before B's base.
        assert_eq!(steps[1].product.id.as_str(), "A001");
        assert_eq!(steps[2].product.id.as_str(), "B001");
    }

    #[tokio::test]
    async fn locked_listings_only_when_enabled() {
        let exchange = Arc::new(
            MockExchange::new()
                .with_flexible(Product::flexible("USDT001", "USDT".into(), dec!(0.05)))
                .with_locked(locked("USDT-90D", "USDT", dec!(0.08), false)),
        );
        let normalizer = CatalogNormalizer::new(exchange, Arc::new(NullNotifier));
        let set = currencies(&["USDT"], "USDT");

        let flexible_only = normalizer.ranked_steps(&set, false).await.unwrap();
        assert_eq!(flexible_only.len(), 1);

        let with_locked = normalizer.ranked_steps(&set, true).await.unwrap();
        assert_eq!(with_locked.len(), 2);
        assert_eq!(with_locked[0].product.id.as_str(), "USDT-90D");
        assert_eq!(with_locked[0].product.kind, ProductKind::Locked);
    }
}
