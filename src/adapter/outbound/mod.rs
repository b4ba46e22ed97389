//! Outbound adapters (driven side).

pub mod binance;
