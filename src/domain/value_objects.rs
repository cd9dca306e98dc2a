//! # Domain Value Objects
//!
//! Identifier and enumeration types for the trading domain:
//!
//! - [`CustomerId`] - Identifier of a ledger customer
//! - [`Ticker`] - Symbol of a tradable instrument
//! - [`TradeAction`] - Buy or sell direction of a trade
//!
//! All types implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, and Serde traits. Tickers and trade actions serialize as
//! SCREAMING_SNAKE_CASE strings on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a ledger customer.
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::value_objects::CustomerId;
///
/// let id = CustomerId::new(1);
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Creates a new customer identifier.
    #[inline]
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CustomerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Symbol of a tradable instrument.
///
/// The system trades a closed set of tickers; an unknown symbol is a
/// deserialization error, never a runtime branch.
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::value_objects::Ticker;
///
/// assert_eq!(Ticker::Google.to_string(), "GOOGLE");
/// assert_eq!("AMAZON".parse::<Ticker>(), Ok(Ticker::Amazon));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Ticker {
    /// Apple Inc.
    Apple = 0,
    /// Amazon.com Inc.
    Amazon = 1,
    /// Alphabet Inc.
    Google = 2,
    /// Microsoft Corp.
    Microsoft = 3,
}

impl Ticker {
    /// All supported tickers.
    pub const ALL: [Self; 4] = [Self::Apple, Self::Amazon, Self::Google, Self::Microsoft];

    /// Returns the wire symbol of this ticker.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apple => "APPLE",
            Self::Amazon => "AMAZON",
            Self::Google => "GOOGLE",
            Self::Microsoft => "MICROSOFT",
        }
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "APPLE" => Ok(Self::Apple),
            "AMAZON" => Ok(Self::Amazon),
            "GOOGLE" => Ok(Self::Google),
            "MICROSOFT" => Ok(Self::Microsoft),
            _ => Err(ParseEnumError::InvalidValue("Ticker", s.to_string())),
        }
    }
}

/// Buy or sell direction of a trade.
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::value_objects::TradeAction;
///
/// assert!(TradeAction::Buy.is_buy());
/// assert_eq!(TradeAction::Sell.to_string(), "SELL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum TradeAction {
    /// Buy - acquire shares, spend balance.
    Buy = 0,
    /// Sell - dispose shares, receive balance.
    Sell = 1,
}

impl TradeAction {
    /// Returns true if this is a buy.
    #[inline]
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }

    /// Returns true if this is a sell.
    #[inline]
    #[must_use]
    pub const fn is_sell(self) -> bool {
        matches!(self, Self::Sell)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ParseEnumError::InvalidValue("TradeAction", s.to_string())),
        }
    }
}

/// Error parsing an enum value from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEnumError {
    /// The value is not a member of the enum.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_display() {
        assert_eq!(CustomerId::new(42).to_string(), "42");
        assert_eq!(CustomerId::from(7).value(), 7);
    }

    #[test]
    fn ticker_round_trip() {
        for ticker in Ticker::ALL {
            assert_eq!(ticker.as_str().parse::<Ticker>(), Ok(ticker));
        }
    }

    #[test]
    fn ticker_parse_is_case_insensitive() {
        assert_eq!("google".parse::<Ticker>(), Ok(Ticker::Google));
    }

    #[test]
    fn ticker_parse_rejects_unknown() {
        assert!("TESLA".parse::<Ticker>().is_err());
    }

    #[test]
    fn ticker_serializes_as_symbol() {
        let json = serde_json::to_string(&Ticker::Microsoft).unwrap_or_default();
        assert_eq!(json, "\"MICROSOFT\"");
    }

    #[test]
    fn trade_action_predicates() {
        assert!(TradeAction::Buy.is_buy());
        assert!(!TradeAction::Buy.is_sell());
        assert!(TradeAction::Sell.is_sell());
    }

    #[test]
    fn trade_action_round_trip() {
        assert_eq!("BUY".parse::<TradeAction>(), Ok(TradeAction::Buy));
        assert_eq!("sell".parse::<TradeAction>(), Ok(TradeAction::Sell));
        assert!("HOLD".parse::<TradeAction>().is_err());
    }
}
