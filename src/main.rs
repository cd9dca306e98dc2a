//! Service entry point: wires the in-memory ledger, the upstream stock
//! service client, and the REST API together and serves HTTP.

use anyhow::Context;
use std::sync::Arc;
use stock_portfolio::api::rest::{AppState, create_router};
use stock_portfolio::application::services::ledger::{LedgerService, TradeExecutor};
use stock_portfolio::application::services::portfolio::PortfolioService;
use stock_portfolio::application::services::price_feed::PriceFeedClient;
use stock_portfolio::config::AppConfig;
use stock_portfolio::infrastructure::persistence::in_memory::InMemoryLedgerStore;
use stock_portfolio::infrastructure::stock_service::http_client::StockServiceHttpClient;
use stock_portfolio::infrastructure::stock_service::{PriceStreamSource, QuoteSource};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stock_portfolio=debug,tower_http=debug,info")),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tracing::info!(
        stock_service_url = %config.stock_service_url,
        "starting stock portfolio service"
    );

    let store = Arc::new(InMemoryLedgerStore::with_demo_data());
    let ledger: Arc<dyn TradeExecutor> = Arc::new(LedgerService::new(store));

    let stock_client = Arc::new(
        StockServiceHttpClient::new(&config.stock_service_url, config.request_timeout_ms)
            .context("failed to build stock service client")?,
    );
    let quotes: Arc<dyn QuoteSource> = Arc::clone(&stock_client) as Arc<dyn QuoteSource>;
    let streams: Arc<dyn PriceStreamSource> = stock_client;

    let price_feed = Arc::new(PriceFeedClient::new(
        Arc::clone(&quotes),
        streams,
        config.retry_policy(),
    ));
    let portfolio = PortfolioService::new(quotes, ledger);

    let state = Arc::new(AppState {
        portfolio,
        price_feed,
    });
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server_addr))?;
    tracing::info!(addr = %config.server_addr, "listening");
    axum::serve(listener, router)
        .await
        .context("server terminated")?;
    Ok(())
}
