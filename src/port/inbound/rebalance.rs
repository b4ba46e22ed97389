//! Rebalancing use cases exposed to inbound adapters.
//!
//! The scheduled trigger drives [`RebalanceUseCase::rebalance`]; the
//! read-only previews back the operator commands.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Action, AllocationStep, BalanceSnapshot, PlanTermination};
use crate::error::Result;

/// Parameters supplied by the trigger for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebalanceRequest {
    /// Whether fixed-term products participate. `None` keeps the configured default.
    pub include_locked: Option<bool>,
}

/// Response payload of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Always true for a returned report; failures surface as errors.
    pub success: bool,
    /// Balances consolidated at the start of the run.
    pub balances: BalanceSnapshot,
    /// Ranked allocation steps the planner walked.
    pub steps: Vec<AllocationStep>,
    /// Settlement and planning side effects, in execution order.
    pub actions: Vec<Action>,
    /// How the planning pass ended.
    pub termination: PlanTermination,
    /// Residual subscriptions made by the sweep.
    pub swept: Vec<Action>,
}

/// Read-only view of what a run would work with.
#[derive(Debug, Clone, Serialize)]
pub struct PlanPreview {
    /// Current balances.
    pub balances: BalanceSnapshot,
    /// Ranked allocation steps.
    pub steps: Vec<AllocationStep>,
}

/// Rebalancing capability surface consumed by inbound adapters.
#[async_trait]
pub trait RebalanceUseCase: Send + Sync {
    /// Execute a full run: aggregate, settle, plan, sweep.
    async fn rebalance(&self, request: RebalanceRequest) -> Result<RunReport>;

    /// Aggregate balances and rank steps without touching the account.
    async fn preview(&self, request: RebalanceRequest) -> Result<PlanPreview>;

    /// Aggregate balances only.
    async fn balances(&self) -> Result<BalanceSnapshot>;
}
