//! # Application Errors
//!
//! The client-facing error taxonomy for trade and portfolio operations.
//!
//! Every variant maps to one structured problem-detail response; the
//! `Display` strings are the user-visible `detail` contract and must stay
//! stable verbatim (for example `"Customer [id=1] is not found"`).

use crate::domain::value_objects::CustomerId;
use thiserror::Error;

/// Client-facing error for trade and portfolio operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// The request failed validation before any network call.
    #[error("{0}")]
    InvalidRequest(String),

    /// The customer does not exist.
    #[error("Customer [id={0}] is not found")]
    CustomerNotFound(CustomerId),

    /// The customer's balance does not cover the buy.
    #[error("Customer [id={0}] does not have enough funds to complete the transaction")]
    InsufficientFunds(CustomerId),

    /// The customer's holding does not cover the sell.
    #[error("Customer [id={0}] does not have enough shares to complete the transaction")]
    InsufficientShares(CustomerId),

    /// The price source failed; the ledger was never called.
    #[error("Price quote is currently unavailable: {0}")]
    QuoteUnavailable(String),

    /// The shared price stream exhausted its retries.
    #[error("Price stream terminated after exhausting retries")]
    UpstreamStreamFailed,

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TradeError {
    /// Creates a validation error with the given detail.
    #[must_use]
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::InvalidRequest(detail.into())
    }

    /// Creates a quote unavailability error.
    #[must_use]
    pub fn quote_unavailable(detail: impl Into<String>) -> Self {
        Self::QuoteUnavailable(detail.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CustomerNotFound(_))
    }

    /// Stable problem-type identifier for this error kind.
    #[must_use]
    pub fn problem_type(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid-input",
            Self::CustomerNotFound(_) => "customer-not-found",
            Self::InsufficientFunds(_) => "insufficient-funds",
            Self::InsufficientShares(_) => "insufficient-shares",
            Self::QuoteUnavailable(_) => "quote-unavailable",
            Self::UpstreamStreamFailed => "price-stream-failed",
            Self::Internal(_) => "internal-error",
        }
    }

    /// Human-readable title for this error kind.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid Input",
            Self::CustomerNotFound(_) => "Customer Not Found",
            Self::InsufficientFunds(_) => "Insufficient Funds",
            Self::InsufficientShares(_) => "Insufficient Shares",
            Self::QuoteUnavailable(_) => "Quote Unavailable",
            Self::UpstreamStreamFailed => "Price Stream Failed",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type for trade operations.
pub type TradeResultType<T> = Result<T, TradeError>;
