//! # Trade Orchestrator
//!
//! Turns a validated trade request into a trade result by composing a
//! price lookup and a ledger call.
//!
//! The pipeline is an explicit sequence of awaited steps: validate, fetch
//! the quote, build the priced order, execute on the ledger, map the
//! outcome. The quote always strictly precedes the ledger call; the order
//! handed to the ledger is built from the observed price, so the two can
//! never run concurrently or reordered. The service keeps no state
//! between invocations.

use crate::application::error::{TradeError, TradeResultType};
use crate::application::services::ledger::{LedgerError, TradeExecutor};
use crate::application::validation::validate_trade_request;
use crate::domain::trade::{CustomerInformation, PricedOrder, TradeRequest, TradeResult};
use crate::domain::value_objects::CustomerId;
use crate::infrastructure::stock_service::QuoteSource;
use std::sync::Arc;

/// Orchestrates trades across the price source and the ledger.
#[derive(Debug, Clone)]
pub struct PortfolioService {
    quotes: Arc<dyn QuoteSource>,
    ledger: Arc<dyn TradeExecutor>,
}

impl PortfolioService {
    /// Creates an orchestrator over the given quote source and ledger.
    #[must_use]
    pub fn new(quotes: Arc<dyn QuoteSource>, ledger: Arc<dyn TradeExecutor>) -> Self {
        Self { quotes, ledger }
    }

    /// Executes one trade for a customer.
    ///
    /// # Errors
    ///
    /// - `TradeError::InvalidRequest` before any network call if the
    ///   request is incomplete; neither the price source nor the ledger
    ///   is contacted.
    /// - `TradeError::QuoteUnavailable` if the price lookup fails; the
    ///   ledger is not called.
    /// - Ledger failures mapped onto their client-facing kinds with the
    ///   customer context preserved.
    pub async fn trade(
        &self,
        customer_id: CustomerId,
        request: TradeRequest,
    ) -> TradeResultType<TradeResult> {
        let validated = validate_trade_request(&request)?;

        let quote = self.quotes.stock_price(validated.ticker).await.map_err(|e| {
            tracing::warn!(ticker = %validated.ticker, error = %e, "quote lookup failed");
            TradeError::quote_unavailable(e.to_string())
        })?;

        let order = PricedOrder::new(
            validated.ticker,
            quote.price,
            validated.quantity,
            validated.action,
        );
        self.ledger
            .execute_trade(customer_id, order)
            .await
            .map_err(map_ledger_error)
    }

    /// Returns a customer with their holdings.
    ///
    /// # Errors
    ///
    /// Returns `TradeError::CustomerNotFound` if the customer is unknown.
    pub async fn customer_information(
        &self,
        customer_id: CustomerId,
    ) -> TradeResultType<CustomerInformation> {
        self.ledger
            .customer_information(customer_id)
            .await
            .map_err(map_ledger_error)
    }
}

/// Re-labels ledger failures as client-facing error kinds.
fn map_ledger_error(error: LedgerError) -> TradeError {
    match error {
        LedgerError::CustomerNotFound(id) => TradeError::CustomerNotFound(id),
        LedgerError::InsufficientFunds(id) => TradeError::InsufficientFunds(id),
        LedgerError::InsufficientShares(id) => TradeError::InsufficientShares(id),
        LedgerError::Store(e) => {
            tracing::error!(error = %e, "ledger store failure");
            TradeError::internal(e.to_string())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::ledger::LedgerResult;
    use crate::domain::trade::PriceQuote;
    use crate::domain::value_objects::{Ticker, TradeAction};
    use crate::infrastructure::stock_service::{StockServiceError, StockServiceResult};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAM: CustomerId = CustomerId::new(1);

    /// Quote source recording calls and serving a fixed price.
    #[derive(Debug)]
    struct FixedQuotes {
        price: StockServiceResult<i64>,
        calls: AtomicUsize,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FixedQuotes {
        fn new(price: StockServiceResult<i64>, log: Arc<Mutex<Vec<&'static str>>>) -> Self {
            Self {
                price,
                calls: AtomicUsize::new(0),
                log,
            }
        }
    }

    #[async_trait]
    impl QuoteSource for FixedQuotes {
        async fn stock_price(&self, ticker: Ticker) -> StockServiceResult<PriceQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap_or_else(|e| e.into_inner()).push("quote");
            self.price.clone().map(|price| PriceQuote { ticker, price })
        }
    }

    /// Ledger recording the orders it receives.
    #[derive(Debug)]
    struct RecordingLedger {
        outcome: Result<i64, fn(CustomerId) -> LedgerError>,
        calls: AtomicUsize,
        orders: Mutex<Vec<PricedOrder>>,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl RecordingLedger {
        fn new(
            outcome: Result<i64, fn(CustomerId) -> LedgerError>,
            log: Arc<Mutex<Vec<&'static str>>>,
        ) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                orders: Mutex::new(Vec::new()),
                log,
            }
        }
    }

    #[async_trait]
    impl TradeExecutor for RecordingLedger {
        async fn execute_trade(
            &self,
            customer_id: CustomerId,
            order: PricedOrder,
        ) -> LedgerResult<TradeResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap_or_else(|e| e.into_inner()).push("ledger");
            self.orders
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(order);
            match &self.outcome {
                Ok(balance) => Ok(TradeResult::from_order(customer_id, &order, *balance)),
                Err(make) => Err(make(customer_id)),
            }
        }

        async fn customer_information(
            &self,
            customer_id: CustomerId,
        ) -> LedgerResult<CustomerInformation> {
            Err(LedgerError::CustomerNotFound(customer_id))
        }
    }

    fn service(
        quote: StockServiceResult<i64>,
        outcome: Result<i64, fn(CustomerId) -> LedgerError>,
    ) -> (Arc<FixedQuotes>, Arc<RecordingLedger>, PortfolioService) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let quotes = Arc::new(FixedQuotes::new(quote, Arc::clone(&log)));
        let ledger = Arc::new(RecordingLedger::new(outcome, log));
        let service = PortfolioService::new(
            Arc::clone(&quotes) as Arc<dyn QuoteSource>,
            Arc::clone(&ledger) as Arc<dyn TradeExecutor>,
        );
        (quotes, ledger, service)
    }

    fn google_buy(quantity: i64) -> TradeRequest {
        TradeRequest::new(Ticker::Google, TradeAction::Buy, quantity)
    }

    #[tokio::test]
    async fn trade_builds_order_from_observed_price() {
        let (_quotes, ledger, service) = service(Ok(110), Ok(9780));

        let result = service.trade(SAM, google_buy(2)).await.unwrap();
        assert_eq!(result.total_price, 220);
        assert_eq!(result.balance, 9780);

        let orders = ledger.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].price, 110);
        assert_eq!(orders[0].quantity, 2);
    }

    #[tokio::test]
    async fn quote_strictly_precedes_ledger_call() {
        let (quotes, ledger, service) = service(Ok(110), Ok(9780));

        service.trade(SAM, google_buy(2)).await.unwrap();

        let log = quotes.log.lock().unwrap().clone();
        assert_eq!(log, vec!["quote", "ledger"]);
        assert_eq!(quotes.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_request_touches_neither_collaborator() {
        let (quotes, ledger, service) = service(Ok(110), Ok(9780));

        let request = TradeRequest {
            ticker: None,
            action: Some(TradeAction::Buy),
            quantity: Some(2),
        };
        let err = service.trade(SAM, request).await.unwrap_err();
        assert_eq!(err.to_string(), "Ticker is required");
        assert_eq!(quotes.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn quote_failure_skips_the_ledger() {
        let (quotes, ledger, service) = service(
            Err(StockServiceError::connection("refused")),
            Ok(9780),
        );

        let err = service.trade(SAM, google_buy(2)).await.unwrap_err();
        assert!(matches!(err, TradeError::QuoteUnavailable(_)));
        assert_eq!(quotes.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ledger_errors_keep_customer_context() {
        let (_quotes, _ledger, service) =
            service(Ok(110), Err(LedgerError::InsufficientFunds));

        let err = service.trade(SAM, google_buy(2)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Customer [id=1] does not have enough funds to complete the transaction"
        );
    }

    #[tokio::test]
    async fn customer_not_found_maps_through() {
        let (_quotes, _ledger, service) =
            service(Ok(110), Err(LedgerError::CustomerNotFound));

        let err = service.trade(SAM, google_buy(2)).await.unwrap_err();
        assert_eq!(err.to_string(), "Customer [id=1] is not found");
    }
}
