//! # Stock Portfolio Service
//!
//! A stock-trading demo service built around three components:
//!
//! - **Price feed client** - one upstream NDJSON subscription shared by
//!   every consumer through a replay-latest broadcast, with bounded
//!   fixed-delay reconnects ([`application::services::price_feed`]).
//! - **Ledger** - atomic BUY/SELL execution against per-customer accounts
//!   with scoped transactions ([`application::services::ledger`]).
//! - **Trade orchestrator** - validate, quote, price the order, execute,
//!   map the outcome ([`application::services::portfolio`]).
//!
//! # Architecture
//!
//! The crate follows a layered layout:
//!
//! - [`domain`] - entities and value objects, no I/O
//! - [`application`] - services, validation, and the error taxonomy
//! - [`infrastructure`] - the in-memory ledger store and the upstream
//!   stock service HTTP client
//! - [`api`] - the axum REST surface, including the SSE price stream
//! - [`config`] - environment-driven runtime configuration

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
