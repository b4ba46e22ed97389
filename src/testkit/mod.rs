//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`exchange`]: `MockExchange`, an in-memory
//!   [`EarnExchange`](crate::port::EarnExchange) with scriptable failures.
//! - [`notifier`]: `RecordingNotifier`, collecting events for assertions.
//! - [`settings`]: Canonical rebalancing settings with zero call delay.

pub mod exchange;
pub mod notifier;
pub mod settings;
