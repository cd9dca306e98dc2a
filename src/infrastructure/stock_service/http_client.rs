//! # Stock Service HTTP Client
//!
//! reqwest-based implementation of [`QuoteSource`] and
//! [`PriceStreamSource`].
//!
//! Quote requests carry a per-request deadline from configuration. The
//! price stream request only bounds connection establishment; the response
//! body is long-lived by design and must not be cut off by a total-request
//! timeout.

use crate::domain::trade::{PriceQuote, PriceUpdate};
use crate::domain::value_objects::Ticker;
use crate::infrastructure::stock_service::{
    PriceStreamSource, QuoteSource, StockServiceError, StockServiceResult,
};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{BoxStream, Stream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// HTTP client for the upstream stock service.
#[derive(Debug, Clone)]
pub struct StockServiceHttpClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl StockServiceHttpClient {
    /// Creates a client for the given base URL.
    ///
    /// `timeout_ms` bounds quote requests and stream connection
    /// establishment.
    ///
    /// # Errors
    ///
    /// Returns `StockServiceError::Connection` if the underlying client
    /// cannot be built.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> StockServiceResult<Self> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| {
                StockServiceError::connection(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_reqwest_error(error: &reqwest::Error) -> StockServiceError {
        if error.is_timeout() {
            StockServiceError::timeout("request timed out")
        } else if error.is_connect() {
            StockServiceError::connection(format!("connection failed: {error}"))
        } else {
            StockServiceError::connection(format!("HTTP request failed: {error}"))
        }
    }

    async fn check_status(response: Response) -> StockServiceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::GATEWAY_TIMEOUT => StockServiceError::timeout(body),
            _ => StockServiceError::status(status.as_u16(), body),
        })
    }
}

#[async_trait]
impl QuoteSource for StockServiceHttpClient {
    async fn stock_price(&self, ticker: Ticker) -> StockServiceResult<PriceQuote> {
        let response = self
            .client
            .get(self.url(&format!("/stock/{ticker}")))
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(&e))?;
        let response = Self::check_status(response).await?;
        response
            .json::<PriceQuote>()
            .await
            .map_err(|e| StockServiceError::protocol(format!("failed to parse quote: {e}")))
    }
}

#[async_trait]
impl PriceStreamSource for StockServiceHttpClient {
    async fn connect(
        &self,
    ) -> StockServiceResult<BoxStream<'static, StockServiceResult<PriceUpdate>>> {
        let response = self
            .client
            .get(self.url("/stock/price-stream"))
            .header(reqwest::header::ACCEPT, "application/x-ndjson")
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(&e))?;
        let response = Self::check_status(response).await?;
        Ok(NdjsonStream::new(response.bytes_stream().boxed()).boxed())
    }
}

/// Decodes a byte stream of newline-delimited JSON price updates.
struct NdjsonStream {
    inner: BoxStream<'static, Result<Bytes, reqwest::Error>>,
    buf: BytesMut,
    done: bool,
}

impl NdjsonStream {
    fn new(inner: BoxStream<'static, Result<Bytes, reqwest::Error>>) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            done: false,
        }
    }

    /// Splits the next complete line off the buffer, skipping blank lines.
    fn next_line(&mut self) -> Option<Bytes> {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos + 1).freeze();
            let trimmed = trim_line(&line);
            if !trimmed.is_empty() {
                return Some(line.slice_ref(trimmed));
            }
        }
        None
    }

    fn parse(line: &[u8]) -> StockServiceResult<PriceUpdate> {
        serde_json::from_slice(line)
            .map_err(|e| StockServiceError::protocol(format!("invalid price update: {e}")))
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    line.get(..end).unwrap_or_default()
}

impl Stream for NdjsonStream {
    type Item = StockServiceResult<PriceUpdate>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }
            if let Some(line) = this.next_line() {
                return Poll::Ready(Some(Self::parse(&line)));
            }
            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.buf.extend_from_slice(&chunk),
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(StockServiceHttpClient::map_reqwest_error(&e))));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    // A final line without a trailing newline still counts.
                    let trailing = trim_line(&this.buf).to_vec();
                    if !trailing.is_empty() {
                        return Poll::Ready(Some(Self::parse(&trailing)));
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures::stream;

    fn update_json(price: i64) -> String {
        format!(
            "{{\"ticker\":\"GOOGLE\",\"price\":{price},\"time\":\"{}\"}}",
            Utc::now().to_rfc3339()
        )
    }

    fn byte_stream(
        chunks: Vec<&str>,
    ) -> BoxStream<'static, Result<Bytes, reqwest::Error>> {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from(c.to_string())))
                .collect::<Vec<_>>(),
        )
        .boxed()
    }

    #[tokio::test]
    async fn decodes_one_update_per_line() {
        let body = format!("{}\n{}\n", update_json(53), update_json(54));
        let mut stream = NdjsonStream::new(byte_stream(vec![&body]));
        assert_eq!(stream.next().await.unwrap().unwrap().price, 53);
        assert_eq!(stream.next().await.unwrap().unwrap().price, 54);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn reassembles_lines_split_across_chunks() {
        let line = update_json(55);
        let (head, tail) = line.split_at(10);
        let tail = format!("{tail}\n");
        let mut stream = NdjsonStream::new(byte_stream(vec![head, tail.as_str()]));
        assert_eq!(stream.next().await.unwrap().unwrap().price, 55);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn final_line_without_newline_is_emitted() {
        let body = update_json(56);
        let mut stream = NdjsonStream::new(byte_stream(vec![&body]));
        assert_eq!(stream.next().await.unwrap().unwrap().price, 56);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let body = format!("\n\n{}\n\n", update_json(57));
        let mut stream = NdjsonStream::new(byte_stream(vec![&body]));
        assert_eq!(stream.next().await.unwrap().unwrap().price, 57);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn invalid_json_is_a_protocol_error() {
        let mut stream = NdjsonStream::new(byte_stream(vec!["not json\n"]));
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, StockServiceError::Protocol(_)));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = StockServiceHttpClient::new("http://localhost:7000/", 5000).unwrap();
        assert_eq!(
            client.url("/stock/GOOGLE"),
            "http://localhost:7000/stock/GOOGLE"
        );
    }
}
