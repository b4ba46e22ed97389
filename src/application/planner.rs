//! Allocation planning and execution.
//!
//! The planner walks ranked steps in order. Before each step it re-reads the
//! live base-currency balance into the [`Ledger`], hands the ledger to the
//! step handler, and gets back the updated ledger together with a
//! [`StepOutcome`] telling it whether to continue or halt.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::pacing::Pacer;
use super::settings::RebalanceSettings;
use super::settlement::Settlement;
use crate::domain::{
    Action, AllocationStep, HaltReason, Ledger, PlanTermination, ProductRef, StepOutcome,
};
use crate::error::Result;
use crate::port::{EarnExchange, Event, Notifier, OrderAmount, StepEvent};

/// Result of a planning pass.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// How the pass ended.
    pub termination: PlanTermination,
    /// Conversions and subscriptions performed, in order.
    pub actions: Vec<Action>,
}

/// Greedy allocator filling steps in descending yield order.
pub struct AllocationPlanner {
    exchange: Arc<dyn EarnExchange>,
    settlement: Settlement,
    settings: Arc<RebalanceSettings>,
    notifier: Arc<dyn Notifier>,
    pacer: Pacer,
}

impl AllocationPlanner {
    /// Create a planner.
    pub fn new(
        exchange: Arc<dyn EarnExchange>,
        settlement: Settlement,
        settings: Arc<RebalanceSettings>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let pacer = Pacer::new(settings.call_delay);
        Self {
            exchange,
            settlement,
            settings,
            notifier,
            pacer,
        }
    }

    /// Execute the ranked steps until one halts or the list runs out.
    ///
    /// Any failure other than the insufficient-balance fallback aborts the
    /// pass; side effects already performed stay in place.
    pub async fn execute(&self, steps: &[AllocationStep]) -> Result<PlanOutcome> {
        let base = self.settings.currencies.base().clone();
        let mut ledger = Ledger::new(base, Decimal::ZERO);
        let mut actions = Vec::new();

        for (index, step) in steps.iter().enumerate() {
            let live = self.exchange.spot_balance(ledger.base()).await?;
            ledger = ledger.observed(live);

            self.notifier.notify(Event::StepEvaluated(StepEvent {
                index,
                step: step.clone(),
                available: ledger.available(),
            }));

            let (next, outcome) = self.execute_step(step, ledger, &mut actions).await?;
            ledger = next;

            if let StepOutcome::Halt(reason) = outcome {
                let termination = PlanTermination::Halted {
                    step: index,
                    reason,
                };
                self.notifier.notify(Event::PlanFinished(termination));
                return Ok(PlanOutcome {
                    termination,
                    actions,
                });
            }
        }

        self.notifier
            .notify(Event::PlanFinished(PlanTermination::Exhausted));
        Ok(PlanOutcome {
            termination: PlanTermination::Exhausted,
            actions,
        })
    }

    /// Act on one step against the given ledger.
    pub async fn execute_step(
        &self,
        step: &AllocationStep,
        ledger: Ledger,
        actions: &mut Vec<Action>,
    ) -> Result<(Ledger, StepOutcome)> {
        if ledger.is_empty() {
            return Ok((ledger, StepOutcome::Halt(HaltReason::FundsExhausted)));
        }
        if step.required_amount.is_some_and(|r| r <= Decimal::ZERO) {
            debug!(product_id = %step.product.id, "Skipping zero-width step");
            return Ok((ledger, StepOutcome::Continue));
        }

        if step.currency() == ledger.base() {
            self.base_step(step, ledger, actions).await
        } else if ledger.available() < self.settings.min_notional {
            info!(
                available = %ledger.available(),
                min_notional = %self.settings.min_notional,
                "Remaining funds below minimum notional"
            );
            Ok((ledger, StepOutcome::Halt(HaltReason::FundsExhausted)))
        } else {
            self.conversion_step(step, ledger, actions).await
        }
    }

    async fn base_step(
        &self,
        step: &AllocationStep,
        ledger: Ledger,
        actions: &mut Vec<Action>,
    ) -> Result<(Ledger, StepOutcome)> {
        match step.required_amount {
            Some(required) => {
                let amount = ledger.cap(required);
                actions.push(self.subscribe(&step.product, amount).await?);
                let ledger = ledger.spend(amount);
                if amount < required {
                    Ok((ledger, StepOutcome::Halt(HaltReason::FundsExhausted)))
                } else {
                    Ok((ledger, StepOutcome::Continue))
                }
            }
            None => {
                let amount = ledger.available();
                actions.push(self.subscribe(&step.product, amount).await?);
                Ok((
                    ledger.spend(amount),
                    StepOutcome::Halt(HaltReason::UnboundedBaseStep),
                ))
            }
        }
    }

    async fn conversion_step(
        &self,
        step: &AllocationStep,
        ledger: Ledger,
        actions: &mut Vec<Action>,
    ) -> Result<(Ledger, StepOutcome)> {
        let currency = step.currency();

        let Some(required) = step.required_amount else {
            let ledger = self.spend_remainder(step, ledger, actions).await?;
            return Ok((ledger, StepOutcome::Halt(HaltReason::UnboundedConversion)));
        };

        match self
            .settlement
            .buy(currency, OrderAmount::Quantity(required))
            .await
        {
            Ok(action) => {
                let ledger = ledger.spend(quote_of(&action));
                actions.push(action);

                let held = self.exchange.spot_balance(currency).await?;
                let amount = required.min(held);
                if amount > Decimal::ZERO {
                    actions.push(self.subscribe(&step.product, amount).await?);
                }
                Ok((ledger, StepOutcome::Continue))
            }
            Err(err) if err.is_insufficient_balance() => {
                info!(
                    currency = %currency,
                    required = %required,
                    available = %ledger.available(),
                    "Exact purchase not covered, spending remainder"
                );
                let ledger = self.spend_remainder(step, ledger, actions).await?;
                Ok((ledger, StepOutcome::Halt(HaltReason::InsufficientFunds)))
            }
            Err(err) => Err(err),
        }
    }

    /// Spend all base funds on the step's currency and subscribe whatever
    /// is held afterwards.
    async fn spend_remainder(
        &self,
        step: &AllocationStep,
        ledger: Ledger,
        actions: &mut Vec<Action>,
    ) -> Result<Ledger> {
        let currency = step.currency();
        let action = self
            .settlement
            .buy(currency, OrderAmount::Quote(ledger.available()))
            .await?;
        let ledger = ledger.spend(quote_of(&action));
        actions.push(action);

        let held = self.exchange.spot_balance(currency).await?;
        if held > Decimal::ZERO {
            actions.push(self.subscribe(&step.product, held).await?);
        }
        Ok(ledger)
    }

    async fn subscribe(&self, product: &ProductRef, amount: Decimal) -> Result<Action> {
        self.exchange.subscribe(product, amount).await?;
        self.pacer.pause().await;

        let action = Action::Subscribed {
            product_id: product.id.clone(),
            currency: product.currency.clone(),
            amount,
        };
        self.notifier.notify(Event::ActionExecuted(action.clone()));
        Ok(action)
    }
}

fn quote_of(action: &Action) -> Decimal {
    match action {
        Action::Converted { quote_amount, .. } => *quote_amount,
        _ => Decimal::ZERO,
    }
}
