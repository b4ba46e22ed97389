//! In-memory [`EarnExchange`] with funding, spot and earn accounts.
//!
//! Conversions settle instantly at a fixed rate per currency (1:1 unless
//! configured). Orders and subscriptions the account cannot cover fail the
//! way the real exchange does, so the planner's fallback paths can be
//! exercised end to end.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{Currency, Product, ProductId, ProductRef, Side};
use crate::error::{Error, ExchangeError};
use crate::port::{EarnExchange, EarnPosition, MarketOrder, OrderAmount, OrderFill};

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FundingBalance(Currency),
    SpotBalance(Currency),
    EarnPositions(Currency),
    FlexibleProducts(Currency),
    LockedProducts(Currency),
    MarketOrder(MarketOrder),
    Subscribe(ProductRef, Decimal),
    Redeem(ProductId),
    Transfer(Currency, Decimal),
}

#[derive(Default)]
struct State {
    funding: HashMap<Currency, Decimal>,
    spot: HashMap<Currency, Decimal>,
    positions: Vec<EarnPosition>,
    flexible: Vec<Product>,
    locked: Vec<Product>,
    rates: HashMap<Currency, Decimal>,
    order_failures: HashMap<Currency, String>,
    subscription_failure: Option<String>,
    calls: Vec<Call>,
    next_order_id: u64,
}

impl State {
    fn balance(map: &HashMap<Currency, Decimal>, currency: &Currency) -> Decimal {
        map.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    fn credit(map: &mut HashMap<Currency, Decimal>, currency: &Currency, amount: Decimal) {
        *map.entry(currency.clone()).or_insert(Decimal::ZERO) += amount;
    }

    fn rate(&self, currency: &Currency) -> Decimal {
        self.rates.get(currency).copied().unwrap_or(Decimal::ONE)
    }
}

fn insufficient() -> Error {
    ExchangeError::Api {
        code: -2010,
        message: "Account has insufficient balance for requested action.".into(),
    }
    .into()
}

/// Scriptable in-memory exchange.
#[derive(Default)]
pub struct MockExchange {
    state: Mutex<State>,
}

impl MockExchange {
    /// Create an exchange with empty accounts and no products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the funding wallet.
    #[must_use]
    pub fn with_funding(self, currency: &str, amount: Decimal) -> Self {
        State::credit(&mut self.state.lock().funding, &currency.into(), amount);
        self
    }

    /// Seed the spot wallet.
    #[must_use]
    pub fn with_spot(self, currency: &str, amount: Decimal) -> Self {
        State::credit(&mut self.state.lock().spot, &currency.into(), amount);
        self
    }

    /// Seed a flexible savings position.
    #[must_use]
    pub fn with_position(self, product_id: &str, currency: &str, amount: Decimal) -> Self {
        self.state.lock().positions.push(EarnPosition {
            product_id: ProductId::new(product_id),
            currency: currency.into(),
            amount,
        });
        self
    }

    /// List a flexible product.
    #[must_use]
    pub fn with_flexible(self, product: Product) -> Self {
        self.state.lock().flexible.push(product);
        self
    }

    /// List a locked product.
    #[must_use]
    pub fn with_locked(self, product: Product) -> Self {
        self.state.lock().locked.push(product);
        self
    }

    /// Price of one unit of `currency` in base units.
    #[must_use]
    pub fn with_rate(self, currency: &str, rate: Decimal) -> Self {
        self.state.lock().rates.insert(currency.into(), rate);
        self
    }

    /// Reject every market order for `currency` with the given message,
    /// under the exchange's generic rejected-order code.
    #[must_use]
    pub fn fail_orders_for(self, currency: &str, message: &str) -> Self {
        self.state
            .lock()
            .order_failures
            .insert(currency.into(), message.to_string());
        self
    }

    /// Reject every subscription with the given message.
    #[must_use]
    pub fn fail_subscriptions(self, message: &str) -> Self {
        self.state.lock().subscription_failure = Some(message.to_string());
        self
    }

    /// Current funding balance.
    pub fn funding(&self, currency: &Currency) -> Decimal {
        State::balance(&self.state.lock().funding, currency)
    }

    /// Current spot balance.
    pub fn spot(&self, currency: &Currency) -> Decimal {
        State::balance(&self.state.lock().spot, currency)
    }

    /// Total earn position in a currency.
    pub fn earn(&self, currency: &Currency) -> Decimal {
        self.state
            .lock()
            .positions
            .iter()
            .filter(|p| &p.currency == currency)
            .map(|p| p.amount)
            .sum()
    }

    /// Total amount subscribed to a product during this session.
    pub fn subscribed_to(&self, product_id: &str) -> Decimal {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Subscribe(product, amount) if product.id.as_str() == product_id => {
                    Some(*amount)
                }
                _ => None,
            })
            .sum()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Market orders received so far.
    pub fn orders(&self) -> Vec<MarketOrder> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::MarketOrder(order) => Some(order),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl EarnExchange for MockExchange {
    fn exchange_name(&self) -> &'static str {
        "mock"
    }

    async fn funding_balance(&self, currency: &Currency) -> Result<Decimal, Error> {
        self.record(Call::FundingBalance(currency.clone()));
        Ok(self.funding(currency))
    }

    async fn spot_balance(&self, currency: &Currency) -> Result<Decimal, Error> {
        self.record(Call::SpotBalance(currency.clone()));
        Ok(self.spot(currency))
    }

    async fn earn_positions(&self, currency: &Currency) -> Result<Vec<EarnPosition>, Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::EarnPositions(currency.clone()));
        Ok(state
            .positions
            .iter()
            .filter(|p| &p.currency == currency)
            .cloned()
            .collect())
    }

    async fn flexible_products(&self, currency: &Currency) -> Result<Vec<Product>, Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::FlexibleProducts(currency.clone()));
        Ok(state
            .flexible
            .iter()
            .filter(|p| &p.currency == currency)
            .cloned()
            .collect())
    }

    async fn locked_products(&self, currency: &Currency) -> Result<Vec<Product>, Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::LockedProducts(currency.clone()));
        Ok(state
            .locked
            .iter()
            .filter(|p| &p.currency == currency)
            .cloned()
            .collect())
    }

    async fn place_market_order(&self, order: &MarketOrder) -> Result<OrderFill, Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::MarketOrder(order.clone()));

        if let Some(message) = state.order_failures.get(&order.currency) {
            return Err(ExchangeError::Api {
                code: -2010,
                message: message.clone(),
            }
            .into());
        }

        let rate = state.rate(&order.currency);
        let (quantity, quote) = match order.amount {
            OrderAmount::Quantity(quantity) => (quantity, quantity * rate),
            OrderAmount::Quote(quote) => (quote / rate, quote),
        };
        if quantity <= Decimal::ZERO {
            return Err(ExchangeError::Api {
                code: -1013,
                message: "Invalid quantity.".into(),
            }
            .into());
        }

        match order.side {
            Side::Buy => {
                if State::balance(&state.spot, &order.base) < quote {
                    return Err(insufficient());
                }
                State::credit(&mut state.spot, &order.base, -quote);
                State::credit(&mut state.spot, &order.currency, quantity);
            }
            Side::Sell => {
                if State::balance(&state.spot, &order.currency) < quantity {
                    return Err(insufficient());
                }
                State::credit(&mut state.spot, &order.currency, -quantity);
                State::credit(&mut state.spot, &order.base, quote);
            }
        }

        state.next_order_id += 1;
        Ok(OrderFill {
            order_id: state.next_order_id.to_string(),
            executed_quantity: quantity,
            quote_amount: quote,
        })
    }

    async fn subscribe(&self, product: &ProductRef, amount: Decimal) -> Result<(), Error> {
        let mut state = self.state.lock();
        if let Some(message) = &state.subscription_failure {
            return Err(ExchangeError::Api {
                code: -6001,
                message: message.clone(),
            }
            .into());
        }

        let available = State::balance(&state.spot, &product.currency);
        if amount <= Decimal::ZERO || amount > available {
            return Err(ExchangeError::InsufficientBalance {
                currency: product.currency.to_string(),
                required: amount,
                available,
            }
            .into());
        }

        state.calls.push(Call::Subscribe(product.clone(), amount));
        State::credit(&mut state.spot, &product.currency, -amount);
        state.positions.push(EarnPosition {
            product_id: product.id.clone(),
            currency: product.currency.clone(),
            amount,
        });
        Ok(())
    }

    async fn redeem(&self, position: &EarnPosition) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::Redeem(position.product_id.clone()));

        let before = state.positions.len();
        state.positions.retain(|p| p.product_id != position.product_id);
        if state.positions.len() == before {
            return Err(ExchangeError::Api {
                code: -6003,
                message: format!("no position in {}", position.product_id),
            }
            .into());
        }
        State::credit(&mut state.funding, &position.currency, position.amount);
        Ok(())
    }

    async fn transfer_funding_to_spot(
        &self,
        currency: &Currency,
        amount: Decimal,
    ) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.calls.push(Call::Transfer(currency.clone(), amount));

        if State::balance(&state.funding, currency) < amount {
            return Err(insufficient());
        }
        State::credit(&mut state.funding, currency, -amount);
        State::credit(&mut state.spot, currency, amount);
        Ok(())
    }
}
