//! Error types for the LiveEngage client
//!
//! Fatal failures are [`Error`] values returned through `Result`. Failing to
//! reach the service at all is deliberately *not* an error here: executor
//! backed calls hand it back as [`Delivery::Unreachable`](crate::Delivery),
//! and callers decide what to do with it.

use crate::signing::SigningError;
use liveengage_core::retry::RetryLimitError;
use thiserror::Error;

/// Result type alias for operations that can fail with a LiveEngage client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the LiveEngage client.
#[derive(Debug, Error)]
pub enum Error {
    /// Request credentials are incomplete. Never retried.
    #[error("Request signing failed: {0}")]
    Signing(#[from] SigningError),

    /// Every allowed retry was spent and the request still failed.
    #[error("Retry limit has been exceeded ({limit})")]
    RetryLimitExceeded {
        /// The configured retry limit
        limit: u32,
        /// The failure observed on the final attempt
        #[source]
        last: TransientFailure,
    },

    /// The discovery endpoint did not yield a base URI for the service.
    #[error("Unable to get account domain for service '{service}': {reason}")]
    DomainResolution {
        /// Logical service name that was looked up
        service: String,
        /// Why resolution failed
        reason: String,
    },

    /// The service could not be reached.
    ///
    /// Only produced when a caller converts a
    /// [`Delivery::Unreachable`](crate::Delivery) with `into_result()`.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The session configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Window end precedes its start.
    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The retry limit setting could not be interpreted.
    #[error("Invalid retry limit: {0}")]
    RetryLimit(#[from] RetryLimitError),

    /// A successful response lacked the structure the client relies on.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A history record could not be mapped into its typed entity.
    #[error("Malformed history record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the record within its page
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Request payload serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// The session behind a history was dropped before paging continued.
    #[error("The session that produced this history has been released")]
    SessionReleased,

    /// A newer query on the same session replaced this history's cursors.
    #[error("This history was superseded by a newer query on the same session")]
    QuerySuperseded,

    /// The session's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error came from exhausting the retry budget.
    pub fn is_retry_exhausted(&self) -> bool {
        matches!(self, Error::RetryLimitExceeded { .. })
    }
}

/// The service could not be reached: refused connection, DNS failure, timeout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Connection error for {url}: {message}")]
pub struct ConnectionError {
    /// Target of the failed request
    pub url: String,
    /// Transport-level description
    pub message: String,
}

impl ConnectionError {
    /// Create a connection error for `url`.
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// A failure that the executor retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransientFailure {
    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The exchange broke after the connection was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response whose body was not valid JSON.
    #[error("undecodable response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_limit_message_carries_limit() {
        let err = Error::RetryLimitExceeded {
            limit: 3,
            last: TransientFailure::Status {
                status: 503,
                body: "busy".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Retry limit has been exceeded (3)");
        assert!(err.is_retry_exhausted());

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("service returned status 503: busy")
        );
    }

    #[test]
    fn test_connection_error_display() {
        let err = ConnectionError::new("https://example.invalid/x", "dns error");
        assert_eq!(
            err.to_string(),
            "Connection error for https://example.invalid/x: dns error"
        );
        let wrapped: Error = err.into();
        assert!(matches!(wrapped, Error::Connection(_)));
        assert!(!wrapped.is_retry_exhausted());
    }

    #[test]
    fn test_domain_resolution_display() {
        let err = Error::DomainResolution {
            service: "msgHist".to_string(),
            reason: "response has no baseURI".to_string(),
        };
        assert!(err.to_string().contains("msgHist"));
    }
}
