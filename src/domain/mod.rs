//! Exchange-agnostic domain types.
//!
//! Everything in here is pure: no I/O, no async. The application services
//! build these values from exchange responses and drive execution from them.

pub mod balance;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod plan;
pub mod product;
pub mod step;
pub mod tier;

pub use balance::{Account, BalanceSnapshot, CurrencyBalance, WalletBalance};
pub use currency::{Currency, CurrencySet};
pub use ledger::Ledger;
pub use plan::{Action, HaltReason, PlanTermination, Side, StepOutcome};
pub use product::{Product, ProductDetail, ProductId, ProductKind, ProductRef, TierRate};
pub use step::{expand_product, rank_steps, AllocationStep, StepSource};
pub use tier::TierBounds;
