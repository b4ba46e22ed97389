//! The rebalancing run: aggregate, settle, plan, sweep.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::balance::BalanceAggregator;
use super::catalog::CatalogNormalizer;
use super::planner::AllocationPlanner;
use super::settings::RebalanceSettings;
use super::settlement::Settlement;
use super::sweep::Sweep;
use crate::domain::{Action, BalanceSnapshot};
use crate::error::Result;
use crate::port::{
    EarnExchange, Notifier, PlanPreview, RebalanceRequest, RebalanceUseCase, RunReport,
};

/// Wires the rebalancing services around one exchange connection.
///
/// A run is strictly linear; callers must not overlap two runs against the
/// same account.
pub struct Rebalancer {
    settings: Arc<RebalanceSettings>,
    aggregator: BalanceAggregator,
    catalog: CatalogNormalizer,
    settlement: Settlement,
    planner: AllocationPlanner,
    sweep: Sweep,
}

impl Rebalancer {
    /// Build the services for an exchange.
    pub fn new(
        exchange: Arc<dyn EarnExchange>,
        settings: RebalanceSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = Arc::new(settings);
        let settlement = Settlement::new(exchange.clone(), settings.clone(), notifier.clone());
        Self {
            aggregator: BalanceAggregator::new(exchange.clone(), notifier.clone()),
            catalog: CatalogNormalizer::new(exchange.clone(), notifier.clone()),
            planner: AllocationPlanner::new(
                exchange.clone(),
                settlement.clone(),
                settings.clone(),
                notifier.clone(),
            ),
            sweep: Sweep::new(exchange, settings.clone(), notifier),
            settlement,
            settings,
        }
    }

    fn include_locked(&self, request: RebalanceRequest) -> bool {
        request.include_locked.unwrap_or(self.settings.include_locked)
    }

    async fn settle(&self) -> Result<(BalanceSnapshot, Vec<Action>)> {
        let balances = self.aggregator.aggregate(&self.settings.currencies).await?;
        let actions = self.settlement.consolidate().await?;
        Ok((balances, actions))
    }
}

#[async_trait]
impl RebalanceUseCase for Rebalancer {
    async fn rebalance(&self, request: RebalanceRequest) -> Result<RunReport> {
        let include_locked = self.include_locked(request);
        info!(include_locked, "Starting rebalance");

        let ((balances, mut actions), steps) = tokio::try_join!(
            self.settle(),
            self.catalog
                .ranked_steps(&self.settings.currencies, include_locked),
        )?;

        let plan = self.planner.execute(&steps).await?;
        actions.extend(plan.actions);

        let swept = self.sweep.run().await?;

        info!(
            actions = actions.len(),
            swept = swept.len(),
            "Rebalance complete"
        );

        Ok(RunReport {
            success: true,
            balances,
            steps,
            actions,
            termination: plan.termination,
            swept,
        })
    }

    async fn preview(&self, request: RebalanceRequest) -> Result<PlanPreview> {
        let include_locked = self.include_locked(request);
        let (balances, steps) = tokio::try_join!(
            self.aggregator.aggregate(&self.settings.currencies),
            self.catalog
                .ranked_steps(&self.settings.currencies, include_locked),
        )?;
        Ok(PlanPreview { balances, steps })
    }

    async fn balances(&self) -> Result<BalanceSnapshot> {
        self.aggregator.aggregate(&self.settings.currencies).await
    }
}
