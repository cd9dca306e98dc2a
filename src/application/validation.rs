//! # Trade Request Validation
//!
//! Fail-fast validation of incoming trade requests.
//!
//! Runs before any network or persistence call, so a rejected request has
//! zero side effects. The detail strings are part of the wire contract.

use crate::application::error::{TradeError, TradeResultType};
use crate::domain::trade::TradeRequest;
use crate::domain::value_objects::{Ticker, TradeAction};

/// A trade request whose fields are all present and valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTrade {
    /// Ticker to trade.
    pub ticker: Ticker,
    /// Buy or sell.
    pub action: TradeAction,
    /// Positive share quantity.
    pub quantity: i64,
}

/// Validates a trade request, reporting the first missing or invalid field.
///
/// # Errors
///
/// Returns `TradeError::InvalidRequest` with one of the contract details:
/// `"Ticker is required"`, `"Trade Action is required"`, or
/// `"Quantity should be > 0"`.
pub fn validate_trade_request(request: &TradeRequest) -> TradeResultType<ValidatedTrade> {
    let ticker = request
        .ticker
        .ok_or_else(|| TradeError::invalid_request("Ticker is required"))?;
    let action = request
        .action
        .ok_or_else(|| TradeError::invalid_request("Trade Action is required"))?;
    let quantity = request
        .quantity
        .filter(|q| *q > 0)
        .ok_or_else(|| TradeError::invalid_request("Quantity should be > 0"))?;
    Ok(ValidatedTrade {
        ticker,
        action,
        quantity,
    })
}
