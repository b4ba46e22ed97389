//! Exchange port for wallet queries, conversions and savings products.
//!
//! This is the only integration point with the exchange. Every method is a
//! remote call that can fail with network, authentication or rate-limit
//! errors; amounts always cross the boundary as [`Decimal`].

use std::fmt;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Currency, Product, ProductId, ProductRef, Side};
use crate::error::Error;

/// A position held in a flexible savings product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarnPosition {
    /// Product the position is held in.
    pub product_id: ProductId,
    /// Position currency.
    pub currency: Currency,
    /// Total position size, principal plus accrued rewards.
    pub amount: Decimal,
}

/// How much a market order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAmount {
    /// Exact quantity of the non-base currency.
    Quantity(Decimal),
    /// Amount of base currency to spend (buy) or receive (sell).
    Quote(Decimal),
}

impl fmt::Display for OrderAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantity(quantity) => write!(f, "quantity {quantity}"),
            Self::Quote(quote) => write!(f, "quote {quote}"),
        }
    }
}

/// A market order converting between a tracked currency and the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrder {
    /// Non-base currency being bought or sold.
    pub currency: Currency,
    /// Settlement currency on the other side of the pair.
    pub base: Currency,
    /// Order direction relative to `currency`.
    pub side: Side,
    /// Order size.
    pub amount: OrderAmount,
}

impl MarketOrder {
    /// Sell an exact quantity of `currency` for base funds.
    #[must_use]
    pub fn sell(currency: Currency, base: Currency, quantity: Decimal) -> Self {
        Self {
            currency,
            base,
            side: Side::Sell,
            amount: OrderAmount::Quantity(quantity),
        }
    }

    /// Buy `currency` with base funds, sized by quantity or by quote.
    #[must_use]
    pub fn buy(currency: Currency, base: Currency, amount: OrderAmount) -> Self {
        Self {
            currency,
            base,
            side: Side::Buy,
            amount,
        }
    }
}

/// Execution report for a filled market order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFill {
    /// Exchange order identifier.
    pub order_id: String,
    /// Quantity of the non-base currency filled.
    pub executed_quantity: Decimal,
    /// Base currency spent or received.
    pub quote_amount: Decimal,
}

/// Remote collaborator providing account, conversion and savings operations.
#[async_trait]
pub trait EarnExchange: Send + Sync {
    /// Get the exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;

    /// Free balance in the funding wallet. Absent currencies read as zero.
    async fn funding_balance(&self, currency: &Currency) -> Result<Decimal, Error>;

    /// Free balance in the spot wallet. Absent currencies read as zero.
    async fn spot_balance(&self, currency: &Currency) -> Result<Decimal, Error>;

    /// Flexible savings positions held in `currency`.
    async fn earn_positions(&self, currency: &Currency) -> Result<Vec<EarnPosition>, Error>;

    /// Flexible savings products accepting `currency`, sold-out ones included.
    async fn flexible_products(&self, currency: &Currency) -> Result<Vec<Product>, Error>;

    /// Locked savings products accepting `currency`, sold-out ones included.
    async fn locked_products(&self, currency: &Currency) -> Result<Vec<Product>, Error>;

    /// Place a market order.
    async fn place_market_order(&self, order: &MarketOrder) -> Result<OrderFill, Error>;

    /// Subscribe `amount` from the spot wallet into a product.
    async fn subscribe(&self, product: &ProductRef, amount: Decimal) -> Result<(), Error>;

    /// Redeem a whole flexible position back to the funding wallet.
    async fn redeem(&self, position: &EarnPosition) -> Result<(), Error>;

    /// Move funds from the funding wallet into the spot wallet.
    async fn transfer_funding_to_spot(
        &self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), Error>;
}
