//! # Infrastructure Layer
//!
//! Adapters behind the application's ports: the ledger persistence store
//! and the HTTP client for the upstream stock service.

pub mod persistence;
pub mod stock_service;
