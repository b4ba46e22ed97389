//! Planning outcomes and the record of executed actions.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::Currency;
use super::product::ProductId;

/// Why the planner stopped before the end of the ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// An unbounded base-currency step claimed the whole pool.
    UnboundedBaseStep,
    /// An unbounded non-base step converted the whole pool.
    UnboundedConversion,
    /// An exact purchase failed for lack of funds; the remainder was spent.
    InsufficientFunds,
    /// The pool was empty or too small to act on.
    FundsExhausted,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnboundedBaseStep => "unbounded base-currency step",
            Self::UnboundedConversion => "unbounded conversion step",
            Self::InsufficientFunds => "insufficient funds for exact purchase",
            Self::FundsExhausted => "funds exhausted",
        };
        f.write_str(text)
    }
}

/// What the drive loop does after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Move on to the next step.
    Continue,
    /// Stop planning.
    Halt(HaltReason),
}

/// How a planning pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanTermination {
    /// A step halted the plan.
    Halted {
        /// Position of the halting step in the ranked list.
        step: usize,
        /// Why it halted.
        reason: HaltReason,
    },
    /// Every step was fully funded.
    Exhausted,
}

/// Direction of a market order, relative to the non-base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Acquire the non-base currency with base funds.
    Buy,
    /// Convert the non-base currency into base funds.
    Sell,
}

/// A side effect performed against the exchange during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// A savings position was redeemed.
    Redeemed {
        /// Product the position was held in.
        product_id: ProductId,
        /// Currency of the position.
        currency: Currency,
        /// Position size at redemption.
        amount: Decimal,
    },
    /// Funds moved from the funding wallet into the spot wallet.
    Transferred {
        /// Currency moved.
        currency: Currency,
        /// Amount moved.
        amount: Decimal,
    },
    /// A market conversion between a tracked currency and the base.
    Converted {
        /// Non-base currency of the pair.
        currency: Currency,
        /// Order direction.
        side: Side,
        /// Quantity of the non-base currency filled.
        quantity: Decimal,
        /// Base currency spent (buy) or received (sell).
        quote_amount: Decimal,
    },
    /// Funds were placed into a savings product.
    Subscribed {
        /// Product subscribed.
        product_id: ProductId,
        /// Currency subscribed.
        currency: Currency,
        /// Amount subscribed.
        amount: Decimal,
    },
}
