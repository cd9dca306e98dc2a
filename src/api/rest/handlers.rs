//! # REST Handlers
//!
//! axum handlers for the customer and stock endpoints, plus the
//! problem-detail error mapping.

use crate::application::error::TradeError;
use crate::application::services::portfolio::PortfolioService;
use crate::application::services::price_feed::PriceFeedClient;
use crate::domain::trade::{CustomerInformation, PriceQuote, TradeRequest, TradeResult};
use crate::domain::value_objects::{CustomerId, Ticker};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;

/// Shared state of the REST API.
#[derive(Debug)]
pub struct AppState {
    /// Trade orchestrator and customer read path.
    pub portfolio: PortfolioService,
    /// Shared live price feed.
    pub price_feed: Arc<PriceFeedClient>,
}

/// RFC-7807 problem detail payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetail {
    /// HTTP status code.
    pub status: u16,
    /// Short human-readable summary of the error kind.
    pub title: String,
    /// User-visible description of this occurrence.
    pub detail: String,
    /// Stable identifier URI of the error kind.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Path of the originating request.
    pub instance: String,
}

impl ProblemDetail {
    /// Builds the problem detail for an error raised on a request path.
    #[must_use]
    pub fn from_error(error: &TradeError, instance: &str) -> Self {
        Self {
            status: status_for(error).as_u16(),
            title: error.title().to_string(),
            detail: error.to_string(),
            problem_type: format!("http://example.com/problems/{}", error.problem_type()),
            instance: instance.to_string(),
        }
    }
}

fn status_for(error: &TradeError) -> StatusCode {
    match error {
        TradeError::InvalidRequest(_)
        | TradeError::InsufficientFunds(_)
        | TradeError::InsufficientShares(_) => StatusCode::BAD_REQUEST,
        TradeError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
        TradeError::QuoteUnavailable(_) | TradeError::UpstreamStreamFailed => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        TradeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A [`TradeError`] tied to its originating request path.
#[derive(Debug)]
pub struct ApiError {
    error: TradeError,
    instance: String,
}

impl ApiError {
    fn new(error: TradeError, uri: &Uri) -> Self {
        Self {
            error,
            instance: uri.path().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let problem = ProblemDetail::from_error(&self.error, &self.instance);
        (status_for(&self.error), Json(problem)).into_response()
    }
}

/// `GET /customers/{id}`
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<i64>,
    uri: Uri,
) -> Result<Json<CustomerInformation>, ApiError> {
    state
        .portfolio
        .customer_information(CustomerId::new(customer_id))
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, &uri))
}

/// `POST /customers/{id}/trade`
pub async fn post_trade(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<i64>,
    uri: Uri,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeResult>, ApiError> {
    state
        .portfolio
        .trade(CustomerId::new(customer_id), request)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, &uri))
}

/// `GET /stock/{ticker}`
pub async fn get_stock_price(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    uri: Uri,
) -> Result<Json<PriceQuote>, ApiError> {
    let ticker: Ticker = ticker
        .parse()
        .map_err(|_| {
            ApiError::new(
                TradeError::invalid_request(format!("Unknown ticker [{ticker}]")),
                &uri,
            )
        })?;
    state
        .price_feed
        .get_price(ticker)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(TradeError::quote_unavailable(e.to_string()), &uri))
}

/// `GET /stock/price-stream`
///
/// Never completes under normal operation; a terminal feed error ends the
/// connection.
pub async fn price_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = state.price_feed.subscribe().map(|item| match item {
        Ok(update) => Event::default().json_data(update),
        Err(e) => Err(axum::Error::new(e)),
    });
    Sse::new(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_detail_for_customer_not_found() {
        let error = TradeError::CustomerNotFound(CustomerId::new(1));
        let problem = ProblemDetail::from_error(&error, "/customers/1");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.title, "Customer Not Found");
        assert_eq!(problem.detail, "Customer [id=1] is not found");
        assert_eq!(
            problem.problem_type,
            "http://example.com/problems/customer-not-found"
        );
        assert_eq!(problem.instance, "/customers/1");
    }

    #[test]
    fn problem_detail_serializes_type_field() {
        let error = TradeError::invalid_request("Ticker is required");
        let problem = ProblemDetail::from_error(&error, "/customers/1/trade");
        let json = serde_json::to_value(&problem).unwrap_or_default();
        assert_eq!(json["type"], "http://example.com/problems/invalid-input");
        assert_eq!(json["detail"], "Ticker is required");
        assert_eq!(json["status"], 400);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_for(&TradeError::InsufficientFunds(CustomerId::new(1))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&TradeError::quote_unavailable("down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&TradeError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
