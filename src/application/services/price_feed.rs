//! # Price Feed Client
//!
//! The shared hot price stream and the one-shot quote lookup.
//!
//! The client keeps at most one live upstream connection. The first
//! subscriber lazily spawns a background feed task that owns the
//! connection, caches the most recent update in a replay-1 slot, and fans
//! updates out over a broadcast channel. Every later subscriber attaches
//! to the same feed and first receives the cached latest update, then live
//! updates in arrival order.
//!
//! If the upstream connection fails or drops mid-stream, the task retries
//! with a fixed delay up to a bounded number of attempts, logging each
//! retry; subscribers never observe these retries. Once the budget is
//! exhausted, every live subscriber receives a terminal error. A clean
//! upstream end-of-stream completes the feed for all subscribers.
//!
//! The feed task's lifetime is independent of any subscriber: it keeps the
//! upstream connection alive even when nobody is listening.

use crate::application::error::TradeError;
use crate::domain::trade::{PriceQuote, PriceUpdate};
use crate::domain::value_objects::Ticker;
use crate::infrastructure::stock_service::{
    PriceStreamSource, QuoteSource, StockServiceError, StockServiceResult,
};
use futures::stream::{Stream, StreamExt};
use parking_lot::RwLock;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Capacity of the fan-out channel; slow subscribers past this lag skip
/// to the live edge.
const FAN_OUT_CAPACITY: usize = 256;

/// Fixed-delay retry budget for the upstream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of consecutive reconnect attempts.
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Observable lifecycle of the shared upstream feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No subscriber has attached yet; no connection exists.
    Unstarted,
    /// The first connection attempt is in flight.
    Connecting,
    /// Updates are flowing.
    Streaming,
    /// The connection dropped; a reconnect is pending.
    Retrying {
        /// Consecutive failed attempts so far.
        attempt: u32,
    },
    /// The upstream stream ended cleanly.
    Completed,
    /// The retry budget is exhausted; the feed is dead.
    Failed,
}

/// Event fanned out to subscribers.
#[derive(Debug, Clone)]
enum FeedEvent {
    Update(PriceUpdate),
    Completed,
    Failed(StockServiceError),
}

/// Shared state between the feed task and subscribers.
#[derive(Debug, Clone)]
struct SharedFeed {
    sender: broadcast::Sender<FeedEvent>,
    last: Arc<RwLock<Option<PriceUpdate>>>,
    state: Arc<RwLock<FeedState>>,
    started: Arc<AtomicBool>,
}

impl SharedFeed {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(FAN_OUT_CAPACITY);
        Self {
            sender,
            last: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(FeedState::Unstarted)),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    fn set_state(&self, state: FeedState) {
        *self.state.write() = state;
    }

    fn state(&self) -> FeedState {
        *self.state.read()
    }
}

/// Client for the upstream price source: one-shot quotes plus the shared
/// broadcast of live price updates.
#[derive(Debug)]
pub struct PriceFeedClient {
    quotes: Arc<dyn QuoteSource>,
    stream_source: Arc<dyn PriceStreamSource>,
    retry: RetryPolicy,
    shared: OnceLock<SharedFeed>,
}

impl PriceFeedClient {
    /// Creates a client over the given quote and stream sources.
    #[must_use]
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        stream_source: Arc<dyn PriceStreamSource>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            quotes,
            stream_source,
            retry,
            shared: OnceLock::new(),
        }
    }

    /// Fetches the current price of a ticker.
    ///
    /// One request, no retry; the caller decides how to handle a failure.
    ///
    /// # Errors
    ///
    /// Propagates the [`StockServiceError`] from the quote source.
    pub async fn get_price(&self, ticker: Ticker) -> StockServiceResult<PriceQuote> {
        self.quotes.stock_price(ticker).await
    }

    /// Attaches a subscriber to the shared price broadcast.
    ///
    /// The upstream connection is established lazily on the first call and
    /// never re-initiated while it is alive. A late subscriber first
    /// receives the most recently observed update, then live updates in
    /// arrival order.
    pub fn subscribe(&self) -> PriceStream {
        let feed = self.shared.get_or_init(SharedFeed::new);

        // Receiver first, replay second: an update that lands in between
        // is delivered twice at worst, never lost.
        let rx = feed.sender.subscribe();
        let replay = *feed.last.read();
        let stream = match feed.state() {
            FeedState::Failed => PriceStream::terminal(replay, Some(TradeError::UpstreamStreamFailed)),
            FeedState::Completed => PriceStream::terminal(replay, None),
            _ => PriceStream::live(replay, rx),
        };

        if !feed.started.swap(true, Ordering::SeqCst) {
            feed.set_state(FeedState::Connecting);
            tokio::spawn(run_feed(
                Arc::clone(&self.stream_source),
                feed.clone(),
                self.retry,
            ));
        }
        stream
    }

    /// Returns the current state of the shared feed.
    #[must_use]
    pub fn state(&self) -> FeedState {
        self.shared
            .get()
            .map_or(FeedState::Unstarted, SharedFeed::state)
    }
}

/// Background task owning the single upstream connection.
async fn run_feed(source: Arc<dyn PriceStreamSource>, feed: SharedFeed, retry: RetryPolicy) {
    let mut attempt: u32 = 0;
    loop {
        match source.connect().await {
            Ok(mut stream) => {
                feed.set_state(FeedState::Streaming);
                let mut failure = None;
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(update) => {
                            // A delivered update proves the connection is
                            // healthy again; the budget bounds consecutive
                            // failures.
                            attempt = 0;
                            *feed.last.write() = Some(update);
                            let _ = feed.sender.send(FeedEvent::Update(update));
                        }
                        Err(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
                match failure {
                    None => {
                        tracing::debug!("price stream completed");
                        feed.set_state(FeedState::Completed);
                        let _ = feed.sender.send(FeedEvent::Completed);
                        return;
                    }
                    Some(e) => {
                        tracing::error!(error = %e, "stock service price stream call failed");
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "stock service price stream call failed");
            }
        }

        attempt += 1;
        if attempt > retry.max_attempts {
            tracing::error!(
                attempts = retry.max_attempts,
                "price stream retries exhausted, terminating feed"
            );
            feed.set_state(FeedState::Failed);
            let _ = feed
                .sender
                .send(FeedEvent::Failed(StockServiceError::connection(
                    "retries exhausted",
                )));
            return;
        }
        feed.set_state(FeedState::Retrying { attempt });
        tracing::error!(attempt, "retrying price stream connection");
        tokio::time::sleep(retry.delay).await;
    }
}

/// A subscriber's view of the shared price broadcast.
///
/// Yields the cached latest update first (if any), then live updates.
/// Ends after a terminal feed event: clean completion ends the stream,
/// retry exhaustion yields one final `Err`.
pub struct PriceStream {
    replay: Option<PriceUpdate>,
    rx: Option<BroadcastStream<FeedEvent>>,
    pending_error: Option<TradeError>,
    done: bool,
}

impl PriceStream {
    fn live(replay: Option<PriceUpdate>, rx: broadcast::Receiver<FeedEvent>) -> Self {
        Self {
            replay,
            rx: Some(BroadcastStream::new(rx)),
            pending_error: None,
            done: false,
        }
    }

    fn terminal(replay: Option<PriceUpdate>, error: Option<TradeError>) -> Self {
        Self {
            replay,
            rx: None,
            pending_error: error,
            done: false,
        }
    }
}

impl Stream for PriceStream {
    type Item = Result<PriceUpdate, TradeError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if let Some(update) = this.replay.take() {
            return Poll::Ready(Some(Ok(update)));
        }
        if let Some(error) = this.pending_error.take() {
            this.done = true;
            return Poll::Ready(Some(Err(error)));
        }
        let Some(rx) = this.rx.as_mut() else {
            this.done = true;
            return Poll::Ready(None);
        };
        loop {
            match rx.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(FeedEvent::Update(update)))) => {
                    return Poll::Ready(Some(Ok(update)));
                }
                Poll::Ready(Some(Ok(FeedEvent::Completed))) | Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Ok(FeedEvent::Failed(e)))) => {
                    tracing::warn!(error = %e, "price stream terminated for subscriber");
                    this.done = true;
                    return Poll::Ready(Some(Err(TradeError::UpstreamStreamFailed)));
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                    // Only the latest values matter; skip to the live edge.
                    tracing::warn!(missed, "price stream subscriber lagged");
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
