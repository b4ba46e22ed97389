//! Binance REST payloads.
//!
//! Amounts arrive as JSON strings and are decoded straight into
//! [`Decimal`]. Tier bonus values are kept raw so an unreadable entry
//! degrades to "no bonus" instead of failing the whole product list.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Currency, Product, ProductDetail, ProductId, ProductKind, TierRate};
use crate::port::EarnPosition;

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

/// Paged list wrapper used by the simple-earn endpoints.
#[derive(Debug, Deserialize)]
pub struct Rows<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// One asset entry of the funding or user-asset endpoints.
#[derive(Debug, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: Decimal,
}

/// Flexible savings position.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexiblePosition {
    pub asset: String,
    pub product_id: String,
    pub total_amount: Decimal,
}

impl From<FlexiblePosition> for EarnPosition {
    fn from(position: FlexiblePosition) -> Self {
        Self {
            product_id: ProductId::new(position.product_id),
            currency: Currency::new(position.asset),
            amount: position.total_amount,
        }
    }
}

/// Flexible savings product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleProduct {
    pub asset: String,
    pub product_id: String,
    pub latest_annual_percentage_rate: Decimal,
    /// Tier schedule in the order the exchange lists it.
    #[serde(default)]
    pub tier_annual_percentage_rate: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub is_sold_out: bool,
}

impl From<FlexibleProduct> for Product {
    fn from(product: FlexibleProduct) -> Self {
        let tiers = product
            .tier_annual_percentage_rate
            .into_iter()
            .map(|(key, value)| TierRate::new(key, bonus_from_value(&value)))
            .collect();

        Self {
            id: ProductId::new(product.product_id),
            kind: ProductKind::Flexible,
            currency: Currency::new(product.asset),
            base_yield: product.latest_annual_percentage_rate,
            tiers,
            sold_out: product.is_sold_out,
            detail: None,
        }
    }
}

/// Locked savings product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedProduct {
    pub project_id: String,
    pub detail: LockedDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedDetail {
    pub asset: String,
    pub apr: Decimal,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_sold_out: bool,
}

impl From<LockedProduct> for Product {
    fn from(product: LockedProduct) -> Self {
        Self {
            id: ProductId::new(product.project_id),
            kind: ProductKind::Locked,
            currency: Currency::new(product.detail.asset),
            base_yield: product.detail.apr,
            tiers: Vec::new(),
            sold_out: false,
            detail: Some(ProductDetail {
                sold_out: product.detail.is_sold_out,
                duration_days: product.detail.duration,
            }),
        }
    }
}

/// Spot order acknowledgement (`newOrderRespType=RESULT`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i64,
    pub executed_qty: Decimal,
    pub cummulative_quote_qty: Decimal,
}

/// Acknowledgement of subscribe, redeem and transfer calls.
#[derive(Debug, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub success: Option<bool>,
}

fn bonus_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::String(raw) => raw.trim().parse().ok(),
        serde_json::Value::Number(number) => number.to_string().parse().ok(),
        _ => None,
    }
}
