//! # In-Memory Persistence
//!
//! In-memory implementation of the ledger store port, used both as the
//! demo backend and in tests.

pub mod ledger_store;

pub use ledger_store::InMemoryLedgerStore;
