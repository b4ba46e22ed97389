//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate the exchange and
//! notifier ports to implement a rebalancing run.

pub mod balance;
pub mod catalog;
pub mod pacing;
pub mod planner;
pub mod rebalance;
pub mod settings;
pub mod settlement;
pub mod sweep;

pub use balance::BalanceAggregator;
pub use catalog::{normalize, CatalogNormalizer};
pub use planner::{AllocationPlanner, PlanOutcome};
pub use rebalance::Rebalancer;
pub use settings::RebalanceSettings;
pub use settlement::Settlement;
pub use sweep::Sweep;
