//! # Stock Service Client
//!
//! Ports and HTTP adapter for the upstream stock service, which serves
//! one-shot quotes (`GET /stock/{ticker}`) and a newline-delimited JSON
//! price stream (`GET /stock/price-stream`).

pub mod http_client;

pub use http_client::StockServiceHttpClient;

use crate::domain::trade::{PriceQuote, PriceUpdate};
use crate::domain::value_objects::Ticker;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use thiserror::Error;

/// Error type for stock service operations.
///
/// Cloneable because a terminal stream failure is fanned out to every
/// subscriber of the shared price feed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockServiceError {
    /// Request exceeded its deadline.
    #[error("stock service timeout: {0}")]
    Timeout(String),

    /// Connection could not be established or was dropped.
    #[error("stock service connection error: {0}")]
    Connection(String),

    /// The service answered with a non-success status.
    #[error("stock service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// A response body could not be decoded.
    #[error("stock service protocol error: {0}")]
    Protocol(String),
}

impl StockServiceError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

/// Result type for stock service operations.
pub type StockServiceResult<T> = Result<T, StockServiceError>;

/// Port for one-shot price quotes.
#[async_trait]
pub trait QuoteSource: Send + Sync + fmt::Debug {
    /// Fetches the current price of a ticker.
    ///
    /// No retry is attempted; the caller decides how to handle failures.
    ///
    /// # Errors
    ///
    /// Returns a [`StockServiceError`] if the quote source is unreachable,
    /// answers with an error status, or returns an undecodable body.
    async fn stock_price(&self, ticker: Ticker) -> StockServiceResult<PriceQuote>;
}

/// Port for the upstream price update stream.
#[async_trait]
pub trait PriceStreamSource: Send + Sync + fmt::Debug {
    /// Opens one connection to the upstream price stream.
    ///
    /// The returned stream yields updates until the connection ends; a
    /// clean end-of-stream is distinct from an `Err` item mid-stream.
    ///
    /// # Errors
    ///
    /// Returns a [`StockServiceError`] if the connection cannot be
    /// established.
    async fn connect(
        &self,
    ) -> StockServiceResult<BoxStream<'static, StockServiceResult<PriceUpdate>>>;
}
