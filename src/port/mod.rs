//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!   CLI ─────────▶│ RebalanceUseCase         │
//!                 │   application services   │
//!                 └──────┬────────────┬──────┘
//!                        ▼            ▼
//!                 ┌────────────┐ ┌──────────┐
//!                 │EarnExchange│ │ Notifier │
//!                 └────────────┘ └──────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::rebalance::{PlanPreview, RebalanceRequest, RebalanceUseCase, RunReport};
pub use outbound::exchange::{EarnExchange, EarnPosition, MarketOrder, OrderAmount, OrderFill};
pub use outbound::notifier::{
    BalancesEvent, Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier, StepEvent,
};
