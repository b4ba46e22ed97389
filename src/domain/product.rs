//! Savings products offered by the exchange.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::currency::Currency;

/// Product identifier - newtype for type safety.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new `ProductId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The fallback flexible product for a currency: its code followed by
    /// the configured suffix (e.g. `USDT` + `001`).
    #[must_use]
    pub fn default_for(currency: &Currency, suffix: &str) -> Self {
        Self(format!("{currency}{suffix}"))
    }

    /// Get the product ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// Redeemable at will.
    Flexible,
    /// Fixed-term with a maturity commitment.
    Locked,
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flexible => write!(f, "flexible"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// Everything needed to subscribe to a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductRef {
    /// Exchange product identifier.
    pub id: ProductId,
    /// Product family, selecting the subscription endpoint.
    pub kind: ProductKind,
    /// Currency the product accepts.
    pub currency: Currency,
}

impl ProductRef {
    /// Reference to a flexible product.
    pub fn flexible(id: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: ProductId::new(id),
            kind: ProductKind::Flexible,
            currency,
        }
    }
}

/// One entry of a tier schedule as published by the exchange.
///
/// The key encodes the balance band (e.g. `0-200USDT`); the bonus is the
/// extra annual yield for amounts in that band. A bonus the exchange sent in
/// an unreadable form is kept as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierRate {
    /// Raw band key.
    pub key: String,
    /// Bonus annual yield on top of the base yield.
    pub bonus: Option<Decimal>,
}

impl TierRate {
    /// Create a tier entry.
    pub fn new(key: impl Into<String>, bonus: Option<Decimal>) -> Self {
        Self {
            key: key.into(),
            bonus,
        }
    }
}

/// Nested detail block. Locked products report availability here rather
/// than at the top level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetail {
    /// Sold-out flag as reported inside the detail block.
    pub sold_out: bool,
    /// Lock-up duration for fixed-term products.
    pub duration_days: Option<u32>,
}

/// A yield-bearing savings offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Exchange product identifier.
    pub id: ProductId,
    /// Product family.
    pub kind: ProductKind,
    /// Currency the product accepts.
    pub currency: Currency,
    /// Base annual yield (fraction, `0.05` = 5%).
    pub base_yield: Decimal,
    /// Tier schedule in exchange order; empty for untiered products.
    pub tiers: Vec<TierRate>,
    /// Top-level sold-out flag.
    pub sold_out: bool,
    /// Optional nested detail block.
    pub detail: Option<ProductDetail>,
}

impl Product {
    /// An untiered flexible product.
    pub fn flexible(id: impl Into<String>, currency: Currency, base_yield: Decimal) -> Self {
        Self {
            id: ProductId::new(id),
            kind: ProductKind::Flexible,
            currency,
            base_yield,
            tiers: Vec::new(),
            sold_out: false,
            detail: None,
        }
    }

    /// Attach a tier schedule.
    #[must_use]
    pub fn with_tiers(mut self, tiers: Vec<TierRate>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Sold out either at the top level or inside the detail block.
    #[must_use]
    pub fn is_sold_out(&self) -> bool {
        self.sold_out || self.detail.as_ref().is_some_and(|detail| detail.sold_out)
    }

    /// True if the product publishes a tier schedule.
    #[must_use]
    pub fn is_tiered(&self) -> bool {
        !self.tiers.is_empty()
    }

    /// Subscription reference for this product.
    #[must_use]
    pub fn product_ref(&self) -> ProductRef {
        ProductRef {
            id: self.id.clone(),
            kind: self.kind,
            currency: self.currency.clone(),
        }
    }
}
