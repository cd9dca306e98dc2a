//! # Persistence
//!
//! Port definitions and backends for the ledger's durable records.
//!
//! The port is deliberately narrow: a [`LedgerStore`] hands out
//! [`LedgerTransaction`]s scoped to one customer, and every balance or
//! holding mutation in the system goes through that transaction. No other
//! code path may write the records.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryLedgerStore;
pub use traits::{LedgerStore, LedgerTransaction, RepositoryError, RepositoryResult};
