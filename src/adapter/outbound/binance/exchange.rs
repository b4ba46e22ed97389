//! [`EarnExchange`] over the Binance REST API.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::client::BinanceClient;
use super::dto::{
    Acknowledgement, AssetBalance, FlexiblePosition, FlexibleProduct, LockedProduct,
    OrderResponse, Rows,
};
use crate::domain::{Currency, Product, ProductKind, ProductRef, Side};
use crate::error::{Error, ExchangeError};
use crate::port::{EarnExchange, EarnPosition, MarketOrder, OrderAmount, OrderFill};

const FUNDING_ASSET: &str = "/sapi/v1/asset/get-funding-asset";
const USER_ASSET: &str = "/sapi/v3/asset/getUserAsset";
const FLEXIBLE_POSITION: &str = "/sapi/v1/simple-earn/flexible/position";
const FLEXIBLE_LIST: &str = "/sapi/v1/simple-earn/flexible/list";
const LOCKED_LIST: &str = "/sapi/v1/simple-earn/locked/list";
const FLEXIBLE_SUBSCRIBE: &str = "/sapi/v1/simple-earn/flexible/subscribe";
const LOCKED_SUBSCRIBE: &str = "/sapi/v1/simple-earn/locked/subscribe";
const FLEXIBLE_REDEEM: &str = "/sapi/v1/simple-earn/flexible/redeem";
const UNIVERSAL_TRANSFER: &str = "/sapi/v1/asset/transfer";
const ORDER: &str = "/api/v3/order";

/// Largest page the simple-earn list endpoints accept.
const PAGE_SIZE: &str = "100";

/// Binance account seen through the exchange port.
pub struct BinanceExchange {
    client: BinanceClient,
}

impl BinanceExchange {
    #[must_use]
    pub fn new(client: BinanceClient) -> Self {
        Self { client }
    }

    async fn free_balance(&self, path: &str, currency: &Currency) -> Result<Decimal, Error> {
        let assets: Vec<AssetBalance> = self
            .client
            .post(path, &[("asset", currency.to_string())])
            .await?;
        Ok(assets
            .into_iter()
            .filter(|asset| asset.asset.eq_ignore_ascii_case(currency.as_str()))
            .map(|asset| asset.free)
            .sum())
    }

    async fn acknowledged(&self, path: &str, params: &[(&str, String)]) -> Result<(), Error> {
        let ack: Acknowledgement = self.client.post(path, params).await?;
        if ack.success == Some(false) {
            return Err(ExchangeError::Api {
                code: 0,
                message: format!("{path} reported failure"),
            }
            .into());
        }
        Ok(())
    }
}

/// Trading pair symbol, non-base currency first (`FDUSDUSDT`).
fn symbol(order: &MarketOrder) -> String {
    format!("{}{}", order.currency, order.base)
}

fn amount_param(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[async_trait]
impl EarnExchange for BinanceExchange {
    fn exchange_name(&self) -> &'static str {
        "Binance"
    }

    async fn funding_balance(&self, currency: &Currency) -> Result<Decimal, Error> {
        self.free_balance(FUNDING_ASSET, currency).await
    }

    async fn spot_balance(&self, currency: &Currency) -> Result<Decimal, Error> {
        self.free_balance(USER_ASSET, currency).await
    }

    async fn earn_positions(&self, currency: &Currency) -> Result<Vec<EarnPosition>, Error> {
        let rows: Rows<FlexiblePosition> = self
            .client
            .get(
                FLEXIBLE_POSITION,
                &[("asset", currency.to_string()), ("size", PAGE_SIZE.into())],
            )
            .await?;
        Ok(rows.rows.into_iter().map(EarnPosition::from).collect())
    }

    async fn flexible_products(&self, currency: &Currency) -> Result<Vec<Product>, Error> {
        let rows: Rows<FlexibleProduct> = self
            .client
            .get(
                FLEXIBLE_LIST,
                &[("asset", currency.to_string()), ("size", PAGE_SIZE.into())],
            )
            .await?;
        debug!(currency = %currency, count = rows.rows.len(), "Fetched flexible products");
        Ok(rows.rows.into_iter().map(Product::from).collect())
    }

    async fn locked_products(&self, currency: &Currency) -> Result<Vec<Product>, Error> {
        let rows: Rows<LockedProduct> = self
            .client
            .get(
                LOCKED_LIST,
                &[("asset", currency.to_string()), ("size", PAGE_SIZE.into())],
            )
            .await?;
        debug!(currency = %currency, count = rows.rows.len(), "Fetched locked products");
        Ok(rows.rows.into_iter().map(Product::from).collect())
    }

    async fn place_market_order(&self, order: &MarketOrder) -> Result<OrderFill, Error> {
        let side = match order.side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        };
        let sizing = match order.amount {
            OrderAmount::Quantity(quantity) => ("quantity", amount_param(quantity)),
            OrderAmount::Quote(quote) => ("quoteOrderQty", amount_param(quote)),
        };

        let response: OrderResponse = self
            .client
            .post(
                ORDER,
                &[
                    ("symbol", symbol(order)),
                    ("side", side.into()),
                    ("type", "MARKET".into()),
                    sizing,
                    ("newOrderRespType", "RESULT".into()),
                ],
            )
            .await?;

        info!(
            symbol = %symbol(order),
            side,
            executed = %response.executed_qty,
            quote = %response.cummulative_quote_qty,
            "Market order filled"
        );

        Ok(OrderFill {
            order_id: response.order_id.to_string(),
            executed_quantity: response.executed_qty,
            quote_amount: response.cummulative_quote_qty,
        })
    }

    async fn subscribe(&self, product: &ProductRef, amount: Decimal) -> Result<(), Error> {
        let (path, id_param) = match product.kind {
            ProductKind::Flexible => (FLEXIBLE_SUBSCRIBE, "productId"),
            ProductKind::Locked => (LOCKED_SUBSCRIBE, "projectId"),
        };
        self.acknowledged(
            path,
            &[
                (id_param, product.id.to_string()),
                ("amount", amount_param(amount)),
            ],
        )
        .await
    }

    async fn redeem(&self, position: &EarnPosition) -> Result<(), Error> {
        self.acknowledged(
            FLEXIBLE_REDEEM,
            &[
                ("productId", position.product_id.to_string()),
                ("redeemAll", "true".into()),
                ("destAccount", "FUND".into()),
            ],
        )
        .await
    }

    async fn transfer_funding_to_spot(
        &self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), Error> {
        let _: serde_json::Value = self
            .client
            .post(
                UNIVERSAL_TRANSFER,
                &[
                    ("type", "FUNDING_MAIN".into()),
                    ("asset", currency.to_string()),
                    ("amount", amount_param(amount)),
                ],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn symbol_puts_traded_currency_first() {
        let order = MarketOrder::sell("FDUSD".into(), "USDT".into(), dec!(40));
        assert_eq!(symbol(&order), "FDUSDUSDT");
    }

    #[test]
    fn amounts_are_sent_without_trailing_zeros() {
        assert_eq!(amount_param(dec!(40.500)), "40.5");
        assert_eq!(amount_param(dec!(100)), "100");
    }
}
