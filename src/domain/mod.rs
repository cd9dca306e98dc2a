//! # Domain Layer
//!
//! Core domain types for the stock portfolio system.
//!
//! This layer holds the value objects, entities, and trade value types that
//! the application services operate on. It has no knowledge of transports,
//! persistence backends, or serialization formats beyond derive-level serde.

pub mod entities;
pub mod trade;
pub mod value_objects;

pub use entities::{Customer, Holding};
pub use trade::{
    CustomerInformation, PriceQuote, PriceUpdate, PricedOrder, TradeRequest, TradeResult,
};
pub use value_objects::{CustomerId, Ticker, TradeAction};
