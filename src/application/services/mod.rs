//! # Application Services
//!
//! The three core services of the system:
//!
//! - [`price_feed`] - the shared hot price stream with replay-of-latest
//! - [`ledger`] - atomic buy/sell execution over the ledger store
//! - [`portfolio`] - the trade orchestrator composing the other two

pub mod ledger;
pub mod portfolio;
pub mod price_feed;
