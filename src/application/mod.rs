//! # Application Layer
//!
//! Client-facing error taxonomy, request validation, and the three core
//! services: the trade orchestrator, the ledger, and the shared price
//! feed.

pub mod error;
pub mod services;
pub mod validation;

pub use error::{TradeError, TradeResultType};
pub use services::ledger::{LedgerError, LedgerService, TradeExecutor};
pub use services::portfolio::PortfolioService;
pub use services::price_feed::{FeedState, PriceFeedClient, PriceStream, RetryPolicy};
