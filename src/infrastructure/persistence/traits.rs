//! # Ledger Store Port
//!
//! Persistence abstraction for the ledger's two record types.
//!
//! The contract is transactional: reads outside a transaction are
//! point-in-time snapshots for read models, while every mutation happens
//! inside a [`LedgerTransaction`] obtained from [`LedgerStore::begin`].
//! A transaction is scoped to exactly one customer and serializes against
//! other transactions for the same customer; transactions for different
//! customers proceed independently.
//!
//! Commit is all-or-nothing: both the customer record and any touched
//! holdings become visible together, or not at all. Dropping a transaction
//! without committing discards every staged change.

use crate::domain::entities::{Customer, Holding};
use crate::domain::value_objects::{CustomerId, Ticker};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for ledger store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Commit failed; the transaction was rolled back.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a commit failure.
    #[must_use]
    pub fn commit_failed(msg: impl Into<String>) -> Self {
        Self::CommitFailed(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for ledger store operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// A unit of work scoped to one customer.
///
/// The transaction holds the customer's serialization token (for the
/// in-memory backend, the per-customer lock), so two transactions for the
/// same customer never interleave. Reads observe the committed state plus
/// this transaction's own staged writes; staged writes are invisible to
/// everyone else until [`commit`](Self::commit) returns `Ok`.
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Returns the customer record, or `None` if the customer is unknown.
    fn customer(&self) -> Option<&Customer>;

    /// Returns the customer's holding for a ticker, if one exists.
    fn holding(&self, ticker: Ticker) -> Option<&Holding>;

    /// Stages an updated customer record.
    fn put_customer(&mut self, customer: Customer);

    /// Stages an updated holding record.
    fn put_holding(&mut self, holding: Holding);

    /// Publishes every staged write in one atomic step.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CommitFailed` if the backend rejects the
    /// write; in that case nothing was applied.
    async fn commit(self: Box<Self>) -> RepositoryResult<()>;
}

/// Port for the ledger's persistence backend.
#[async_trait]
pub trait LedgerStore: Send + Sync + fmt::Debug {
    /// Returns a point-in-time snapshot of a customer record.
    async fn find_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;

    /// Returns a point-in-time snapshot of all holdings of a customer.
    ///
    /// The list is empty for customers that never traded; zero-quantity
    /// positions are included.
    async fn find_holdings(&self, id: CustomerId) -> RepositoryResult<Vec<Holding>>;

    /// Opens a transaction scoped to one customer.
    ///
    /// Waits until no other transaction for the same customer is active.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot open the transactional scope.
    async fn begin(&self, id: CustomerId) -> RepositoryResult<Box<dyn LedgerTransaction>>;
}
