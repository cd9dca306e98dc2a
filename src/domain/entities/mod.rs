//! # Domain Entities
//!
//! The two records the ledger owns exclusively:
//!
//! - [`Customer`] - a customer and their cash balance
//! - [`Holding`] - a customer's owned quantity of one ticker
//!
//! Both are mutated only through the ledger's atomic trade execution path.

pub mod customer;
pub mod holding;

pub use customer::Customer;
pub use holding::Holding;
