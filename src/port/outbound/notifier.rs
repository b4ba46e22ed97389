//! Notifier port for domain events.
//!
//! The application services report what they evaluate and execute through
//! this narrow interface instead of logging directly, so the rebalancing
//! core stays independent of any logging backend.

use rust_decimal::Decimal;

use crate::domain::{Action, AllocationStep, Currency, PlanTermination};

/// Events emitted during a rebalancing run.
#[derive(Debug, Clone)]
pub enum Event {
    /// Balances were collected for every tracked currency.
    BalancesAggregated(BalancesEvent),
    /// The product catalog was normalized into ranked steps.
    CatalogNormalized {
        /// Products that survived the sold-out filter.
        products: usize,
        /// Steps produced from them.
        steps: usize,
    },
    /// An exchange side effect completed.
    ActionExecuted(Action),
    /// A conversion was skipped because the amount is below the minimum notional.
    ConversionSkipped {
        /// Currency that was not converted.
        currency: Currency,
        /// Amount held.
        amount: Decimal,
        /// Threshold it fell short of.
        min_notional: Decimal,
    },
    /// A conversion failed and was abandoned for this currency.
    ConversionFailed {
        /// Currency that was not converted.
        currency: Currency,
        /// Failure description.
        reason: String,
    },
    /// The planner is about to act on a step.
    StepEvaluated(StepEvent),
    /// The planning pass finished.
    PlanFinished(PlanTermination),
    /// The residual sweep finished.
    SweepFinished {
        /// Number of subscriptions the sweep made.
        subscriptions: usize,
    },
}

/// Balance aggregation summary.
#[derive(Debug, Clone)]
pub struct BalancesEvent {
    /// Number of currencies queried.
    pub currencies: usize,
    /// Consolidated total across currencies.
    pub total: Decimal,
}

/// Planner step evaluation.
#[derive(Debug, Clone)]
pub struct StepEvent {
    /// Position in the ranked list.
    pub index: usize,
    /// The step being evaluated.
    pub step: AllocationStep,
    /// Live base-currency balance before acting.
    pub available: Decimal,
}

/// Trait for notification handlers.
///
/// Implementations must be thread-safe and should return quickly.
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::BalancesAggregated(e) => {
                info!(currencies = e.currencies, total = %e.total, "Balances aggregated");
            }
            Event::CatalogNormalized { products, steps } => {
                info!(products, steps, "Catalog normalized");
            }
            Event::ActionExecuted(action) => log_action(&action),
            Event::ConversionSkipped {
                currency,
                amount,
                min_notional,
            } => {
                info!(
                    currency = %currency,
                    amount = %amount,
                    min_notional = %min_notional,
                    "Conversion skipped below minimum notional"
                );
            }
            Event::ConversionFailed { currency, reason } => {
                warn!(currency = %currency, reason = %reason, "Conversion failed");
            }
            Event::StepEvaluated(e) => {
                info!(
                    index = e.index,
                    product_id = %e.step.product.id,
                    currency = %e.step.currency(),
                    effective_yield = %e.step.effective_yield,
                    required = ?e.step.required_amount,
                    available = %e.available,
                    "Evaluating step"
                );
            }
            Event::PlanFinished(PlanTermination::Halted { step, reason }) => {
                info!(step, reason = %reason, "Plan halted");
            }
            Event::PlanFinished(PlanTermination::Exhausted) => {
                info!("Plan exhausted all steps");
            }
            Event::SweepFinished { subscriptions } => {
                info!(subscriptions, "Sweep finished");
            }
        }
    }
}

fn log_action(action: &Action) {
    use tracing::info;
    match action {
        Action::Redeemed {
            product_id,
            currency,
            amount,
        } => info!(product_id = %product_id, currency = %currency, amount = %amount, "Redeemed"),
        Action::Transferred { currency, amount } => {
            info!(currency = %currency, amount = %amount, "Transferred funding to spot");
        }
        Action::Converted {
            currency,
            side,
            quantity,
            quote_amount,
        } => info!(
            currency = %currency,
            side = ?side,
            quantity = %quantity,
            quote_amount = %quote_amount,
            "Converted"
        ),
        Action::Subscribed {
            product_id,
            currency,
            amount,
        } => info!(product_id = %product_id, currency = %currency, amount = %amount, "Subscribed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Notifier for Counting {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn registry_broadcasts_to_every_notifier() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(NullNotifier));
        assert_eq!(registry.len(), 3);

        registry.notify(Event::SweepFinished { subscriptions: 0 });
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }
}
