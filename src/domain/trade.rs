//! # Trade Value Types
//!
//! Transient values that flow through one trade:
//!
//! - [`TradeRequest`] - the client's intent as received on the wire
//! - [`PriceQuote`] - an observed price for a ticker
//! - [`PricedOrder`] - intent combined with a quote, handed to the ledger
//! - [`TradeResult`] - the post-trade outcome returned to the caller
//! - [`PriceUpdate`] - one element of the live price stream
//! - [`CustomerInformation`] - a customer read model with their holdings
//!
//! None of these are persisted; the ledger entities in
//! [`crate::domain::entities`] are the only durable records.

use crate::domain::value_objects::{CustomerId, Ticker, TradeAction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trade intent as received from the client.
///
/// All fields are optional so validation can report exactly which one is
/// missing; any of them may be absent from the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Ticker to trade.
    pub ticker: Option<Ticker>,
    /// Buy or sell.
    pub action: Option<TradeAction>,
    /// Number of shares; must be positive.
    pub quantity: Option<i64>,
}

impl TradeRequest {
    /// Creates a fully populated trade request.
    #[must_use]
    pub const fn new(ticker: Ticker, action: TradeAction, quantity: i64) -> Self {
        Self {
            ticker: Some(ticker),
            action: Some(action),
            quantity: Some(quantity),
        }
    }
}

/// An observed price for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Quoted ticker.
    pub ticker: Ticker,
    /// Price in currency minor units.
    pub price: i64,
}

/// One element of the live price stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Updated ticker.
    pub ticker: Ticker,
    /// Price in currency minor units.
    pub price: i64,
    /// Observation time at the price source.
    pub time: DateTime<Utc>,
}

/// A validated trade intent combined with an observed price.
///
/// Built by the orchestrator and passed to the ledger; the ledger never
/// fetches prices itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    /// Ticker to trade.
    pub ticker: Ticker,
    /// Price per share in currency minor units.
    pub price: i64,
    /// Number of shares.
    pub quantity: i64,
    /// Buy or sell.
    pub action: TradeAction,
}

impl PricedOrder {
    /// Creates a priced order.
    #[must_use]
    pub const fn new(ticker: Ticker, price: i64, quantity: i64, action: TradeAction) -> Self {
        Self {
            ticker,
            price,
            quantity,
            action,
        }
    }

    /// Returns `price * quantity` in currency minor units.
    ///
    /// Saturates instead of overflowing so a hostile quantity cannot panic
    /// the overflow-checked build.
    #[inline]
    #[must_use]
    pub const fn total_price(&self) -> i64 {
        self.price.saturating_mul(self.quantity)
    }
}

/// The outcome of a successful trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResult {
    /// Customer who traded.
    pub customer_id: CustomerId,
    /// Traded ticker.
    pub ticker: Ticker,
    /// Executed price per share.
    pub price: i64,
    /// Executed quantity.
    pub quantity: i64,
    /// Buy or sell.
    pub action: TradeAction,
    /// `price * quantity`.
    pub total_price: i64,
    /// Customer balance after the trade.
    pub balance: i64,
}

impl TradeResult {
    /// Builds a result from an executed order and the post-trade balance.
    #[must_use]
    pub const fn from_order(customer_id: CustomerId, order: &PricedOrder, balance: i64) -> Self {
        Self {
            customer_id,
            ticker: order.ticker,
            price: order.price,
            quantity: order.quantity,
            action: order.action,
            total_price: order.total_price(),
            balance,
        }
    }
}

/// A ticker position as exposed by the customer information endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingView {
    /// Held ticker.
    pub ticker: Ticker,
    /// Owned quantity.
    pub quantity: i64,
}

/// A customer read model with their holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInformation {
    /// Customer identifier.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Balance in currency minor units.
    pub balance: i64,
    /// All holdings, including zero-quantity positions.
    pub holdings: Vec<HoldingView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_price_multiplies() {
        let order = PricedOrder::new(Ticker::Google, 110, 2, TradeAction::Buy);
        assert_eq!(order.total_price(), 220);
    }

    #[test]
    fn total_price_saturates() {
        let order = PricedOrder::new(Ticker::Google, i64::MAX, 2, TradeAction::Buy);
        assert_eq!(order.total_price(), i64::MAX);
    }

    #[test]
    fn trade_result_from_order() {
        let order = PricedOrder::new(Ticker::Google, 110, 2, TradeAction::Buy);
        let result = TradeResult::from_order(CustomerId::new(1), &order, 9780);
        assert_eq!(result.total_price, 220);
        assert_eq!(result.balance, 9780);
        assert_eq!(result.action, TradeAction::Buy);
    }

    #[test]
    fn trade_result_serializes_camel_case() {
        let order = PricedOrder::new(Ticker::Google, 110, 2, TradeAction::Buy);
        let result = TradeResult::from_order(CustomerId::new(1), &order, 9780);
        let json = serde_json::to_value(result).unwrap_or_default();
        assert_eq!(json["customerId"], 1);
        assert_eq!(json["totalPrice"], 220);
        assert_eq!(json["balance"], 9780);
    }

    #[test]
    fn trade_request_deserializes_partial_body() {
        let request: TradeRequest =
            serde_json::from_str(r#"{"action":"BUY","quantity":2}"#).unwrap_or_default();
        assert!(request.ticker.is_none());
        assert_eq!(request.action, Some(TradeAction::Buy));
        assert_eq!(request.quantity, Some(2));
    }
}
