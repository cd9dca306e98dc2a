//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! - `GET /customers/{id}` - Customer information with holdings
//! - `POST /customers/{id}/trade` - Execute a trade
//! - `GET /stock/{ticker}` - Current price of a ticker
//! - `GET /stock/price-stream` - Server-sent stream of price updates
//!
//! Every error response is an RFC-7807 problem detail with a stable
//! `type` URI and the user-visible `detail` string.
//!
//! # Usage
//!
//! ```ignore
//! use stock_portfolio::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState { portfolio, price_feed });
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ProblemDetail};
pub use routes::create_router;
