//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`rebalance`]: the scheduled rebalancing run and its read-only previews

pub mod rebalance;
