//! # Route Table
//!
//! Wires the REST handlers into an axum router with request tracing.

use crate::api::rest::handlers::{
    AppState, get_customer, get_stock_price, post_trade, price_stream,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the application router.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}/trade", post(post_trade))
        .route("/stock/price-stream", get(price_stream))
        .route("/stock/{ticker}", get(get_stock_price))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
