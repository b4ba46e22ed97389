//! Allocation steps: directly executable units derived from products.

use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::{Currency, CurrencySet};
use super::product::{Product, ProductRef, TierRate};
use super::tier::TierBounds;

/// Where a step's yield came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepSource {
    /// The product's untiered base yield.
    Base,
    /// A tier band of the product's schedule.
    Tier {
        /// Raw tier key the step was built from.
        key: String,
    },
}

/// A flattened, rankable allocation unit.
///
/// `required_amount` is the band width for a bounded tier step. Steps without
/// it are unbounded and consume whatever remains for their currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationStep {
    /// Product to subscribe to.
    pub product: ProductRef,
    /// Annual yield for funds placed by this step.
    pub effective_yield: Decimal,
    /// Amount the step can absorb, `None` when unbounded.
    pub required_amount: Option<Decimal>,
    /// Origin of the step.
    pub source: StepSource,
}

impl AllocationStep {
    /// Currency the step needs funds in.
    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.product.currency
    }

    fn base(product: &Product) -> Self {
        Self {
            product: product.product_ref(),
            effective_yield: product.base_yield,
            required_amount: None,
            source: StepSource::Base,
        }
    }

    fn tier(product: &Product, tier: &TierRate, tracked: &CurrencySet) -> Self {
        let effective_yield = match tier.bonus {
            Some(bonus) => product.base_yield + bonus,
            None => product.base_yield,
        };
        Self {
            product: product.product_ref(),
            effective_yield,
            required_amount: TierBounds::parse(&tier.key).required_amount(tracked),
            source: StepSource::Tier {
                key: tier.key.clone(),
            },
        }
    }
}

/// Expand a product into its allocation steps.
///
/// An untiered product yields one unbounded base step. A product with N
/// tier entries yields N + 1 steps: the base step followed by one step per
/// tier, in schedule order. Tier keys that do not parse, or that name an
/// untracked currency, still produce a step, just without a required amount.
#[must_use]
pub fn expand_product(product: &Product, tracked: &CurrencySet) -> Vec<AllocationStep> {
    let mut steps = Vec::with_capacity(product.tiers.len() + 1);
    steps.push(AllocationStep::base(product));
    steps.extend(
        product
            .tiers
            .iter()
            .map(|tier| AllocationStep::tier(product, tier, tracked)),
    );
    steps
}

/// Order steps by effective yield, highest first. Equal yields keep their
/// input order.
#[must_use]
pub fn rank_steps(mut steps: Vec<AllocationStep>) -> Vec<AllocationStep> {
    steps.sort_by(|a, b| b.effective_yield.cmp(&a.effective_yield));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tracked() -> CurrencySet {
        CurrencySet::try_new(vec!["A".into(), "B".into(), "C".into()], "A".into()).unwrap()
    }

    #[test]
    fn untiered_product_yields_single_unbounded_step() {
        let product = Product::flexible("A001", "A".into(), dec!(0.05));
        let steps = expand_product(&product, &tracked());

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].effective_yield, dec!(0.05));
        assert_eq!(steps[0].required_amount, None);
        assert_eq!(steps[0].source, StepSource::Base);
    }

    #[test]
    fn tiered_product_yields_base_plus_one_step_per_tier() {
        let product = Product::flexible("B001", "B".into(), dec!(0.05)).with_tiers(vec![
            TierRate::new("0-100A", Some(dec!(0.02))),
            TierRate::new("100-200A", Some(dec!(0.01))),
        ]);
        let steps = expand_product(&product, &tracked());

        assert_eq!(steps.len(), 3);
        let yields: Vec<_> = steps.iter().map(|s| s.effective_yield).collect();
        assert_eq!(yields, vec![dec!(0.05), dec!(0.07), dec!(0.06)]);
        assert_eq!(steps[1].required_amount, Some(dec!(100)));
        assert_eq!(steps[2].required_amount, Some(dec!(100)));
        assert!(steps.iter().all(|s| s.currency().as_str() == "B"));
    }

    #[test]
    fn unparseable_tier_is_kept_as_unbounded() {
        let product = Product::flexible("B001", "B".into(), dec!(0.03)).with_tiers(vec![
            TierRate::new("above 200", Some(dec!(0.01))),
            TierRate::new("0-5BTC", Some(dec!(0.02))),
        ]);
        let steps = expand_product(&product, &tracked());

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].effective_yield, dec!(0.04));
        assert_eq!(steps[1].required_amount, None);
        assert_eq!(steps[2].effective_yield, dec!(0.05));
        assert_eq!(steps[2].required_amount, None);
    }

    #[test]
    fn unreadable_bonus_keeps_base_yield() {
        let product = Product::flexible("B001", "B".into(), dec!(0.03))
            .with_tiers(vec![TierRate::new("0-100B", None)]);
        let steps = expand_product(&product, &tracked());

        assert_eq!(steps[1].effective_yield, dec!(0.03));
        assert_eq!(steps[1].required_amount, Some(dec!(100)));
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let a = Product::flexible("A001", "A".into(), dec!(0.05));
        let b = Product::flexible("B001", "B".into(), dec!(0.05));
        let c = Product::flexible("C001", "C".into(), dec!(0.08));

        let steps = [a, b, c]
            .iter()
            .flat_map(|p| expand_product(p, &tracked()))
            .collect();
        let ranked = rank_steps(steps);

        let ids: Vec<_> = ranked.iter().map(|s| s.product.id.as_str()).collect();
        assert_eq!(ids, vec!["C001", "A001", "B001"]);
    }
}
