//! Structured logging for requests, retries and pagination
//!
//! Every request the executor issues is logged through this layer so the
//! field names stay consistent across call sites.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST)
    pub method: String,
    /// Target URL
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self, attempt: u32) {
        debug!(
            method = %self.method,
            url = %self.url,
            body_size = self.body_size,
            attempt,
            "Sending signed request"
        );
    }

    /// Log a transient failure that will be retried
    pub fn log_retry(&self, retries: u32, delay: Duration, reason: &str) {
        debug!(
            method = %self.method,
            url = %self.url,
            retries,
            delay_us = delay.as_micros() as u64,
            reason = %reason,
            "Retrying request after transient failure"
        );
    }

    /// Log a connection-level failure handed back to the caller
    pub fn log_unreachable(&self, elapsed: Duration, reason: &str) {
        warn!(
            method = %self.method,
            url = %self.url,
            elapsed_ms = elapsed.as_millis() as u64,
            reason = %reason,
            "Service unreachable"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Response body size in bytes (optional)
    pub body_size: Option<usize>,
    /// Time elapsed for the request
    pub elapsed: Duration,
    /// Retries spent on the current query so far
    pub retries: u32,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            body_size: None,
            elapsed,
            retries: 0,
        }
    }

    /// Set the response body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Set the number of retries
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Log successful response
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            method = %request.method,
            url = %request.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            body_size = self.body_size,
            retries = self.retries,
            "Request succeeded"
        );
    }

    /// Log a failed response
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        warn!(
            method = %request.method,
            url = %request.url,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis() as u64,
            error = %error,
            retries = self.retries,
            "Request failed"
        );
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Log a history page that was fetched and mapped
pub fn log_page(kind: &str, direction: &str, records: usize, has_next: bool, has_prev: bool) {
    debug!(
        kind = %kind,
        direction = %direction,
        records,
        has_next,
        has_prev,
        "History page mapped"
    );
}

/// Install a `tracing-subscriber` formatter honoring `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "trace")]
pub fn init_tracing() -> bool {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("liveengage=info")),
        )
        .try_init()
        .is_ok()
}
