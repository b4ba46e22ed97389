//! Yieldsweep - rebalance idle stablecoins into the best-yielding savings
//! products of a centralized exchange.
//!
//! A run consolidates every tracked currency into the spot wallet of the
//! base currency, walks the flexible (and optionally locked) savings
//! products in descending yield order, fills each tier band with exactly
//! the amount it pays the bonus on, and finally sweeps whatever is left
//! into each currency's default flexible product.
//!
//! # Modules
//!
//! - [`domain`] - Exchange-agnostic types: currencies, balances, products, steps
//! - [`port`] - Inbound use case and outbound exchange/notifier traits
//! - [`application`] - Aggregation, normalization, settlement, planning, sweep
//! - [`adapter`] - Binance REST client and the command-line interface
//! - [`infrastructure`] - Configuration loading and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use yieldsweep::infrastructure::bootstrap;
//! use yieldsweep::infrastructure::config::settings::Config;
//! use yieldsweep::port::{RebalanceRequest, RebalanceUseCase};
//!
//! # async fn run() -> yieldsweep::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let rebalancer = bootstrap::build_rebalancer(&config)?;
//! let report = rebalancer.rebalance(RebalanceRequest::default()).await?;
//! assert!(report.success);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
