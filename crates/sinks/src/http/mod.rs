//! HTTP sink - batch POST to a remote endpoint
//!
//! Joins the batch's records with `\n` and POSTs them as `text/plain` with
//! any configured headers. Success is any status in `[200, 300)`. One
//! request per batch, 5 second timeout, no retry: a failed batch is
//! reported to the worker, which logs and discards it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::{Sink, SinkError, SinkResult};

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

/// Default per-request timeout
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP sink configuration
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Target URL for batch POSTs
    pub url: String,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl HttpSinkConfig {
    /// Create a config for the given URL with default timeout and no
    /// extra headers
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set extra request headers
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Metrics for the HTTP sink
#[derive(Debug, Default)]
pub struct HttpSinkMetrics {
    batches_sent: AtomicU64,
    batches_failed: AtomicU64,
    bytes_sent: AtomicU64,
}

impl HttpSinkMetrics {
    /// Point-in-time snapshot
    pub fn snapshot(&self) -> HttpMetricsSnapshot {
        HttpMetricsSnapshot {
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of HTTP sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpMetricsSnapshot {
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub bytes_sent: u64,
}

/// POSTs newline-joined batches to a remote endpoint
pub struct HttpSink {
    name: String,
    url: String,
    headers: HashMap<String, String>,
    client: reqwest::Client,
    cancel: CancellationToken,
    metrics: HttpSinkMetrics,
}

impl HttpSink {
    /// Create an HTTP sink.
    ///
    /// # Errors
    ///
    /// Returns a config error for an empty URL or if the HTTP client
    /// cannot be built.
    pub fn new(config: HttpSinkConfig) -> SinkResult<Self> {
        Self::with_name("http", config)
    }

    /// Create an HTTP sink with a custom name
    pub fn with_name(name: impl Into<String>, config: HttpSinkConfig) -> SinkResult<Self> {
        if config.url.is_empty() {
            return Err(SinkError::config("http sink requires a non-empty url"));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SinkError::config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            name: name.into(),
            url: config.url,
            headers: config.headers,
            client,
            cancel: CancellationToken::new(),
            metrics: HttpSinkMetrics::default(),
        })
    }

    /// Bind shutdown cancellation so in-flight requests are abandoned when
    /// the process stops
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Target URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get sink metrics
    pub fn metrics(&self) -> &HttpSinkMetrics {
        &self.metrics
    }

    /// Records joined by `\n` into one request body
    fn join_body(batch: &[Bytes]) -> Vec<u8> {
        let total: usize = batch.iter().map(|r| r.len()).sum();
        let mut body = Vec::with_capacity(total + batch.len().saturating_sub(1));

        for (i, record) in batch.iter().enumerate() {
            if i > 0 {
                body.push(b'\n');
            }
            body.extend_from_slice(record);
        }
        body
    }

    async fn post(&self, body: Vec<u8>) -> SinkResult<()> {
        let bytes = body.len() as u64;

        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body);
        for (key, value) in &self.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = tokio::select! {
            result = request.send() => result?,
            _ = self.cancel.cancelled() => return Err(SinkError::Cancelled),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::HttpStatus {
                status: status.as_u16(),
            });
        }

        self.metrics.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.metrics.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sink for HttpSink {
    async fn write_batch(&self, batch: &[Bytes]) -> SinkResult<()> {
        let result = self.post(Self::join_body(batch)).await;
        if result.is_err() {
            self.metrics.batches_failed.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for HttpSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSink")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish()
    }
}
