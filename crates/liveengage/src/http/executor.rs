//! Signed request execution with bounded retry.

use std::sync::Arc;

use http::{HeaderValue, Method, header::CONTENT_TYPE};
use liveengage_core::retry::{BackoffStrategy, RetryLimit};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{Delivery, OutgoingRequest, Transport, TransportError};
use crate::{
    config::Credentials,
    error::{ConnectionError, Error, Result, TransientFailure},
    observability::{RequestMetadata, RequestTimer, ResponseMetadata},
    signing::RequestSigner,
};

/// Longest slice of an error body kept in a [`TransientFailure`].
const ERROR_BODY_LIMIT: usize = 512;

/// Issues signed JSON requests and retries transient failures.
///
/// The retry counter is owned by the caller so that every page of one query
/// draws on the same budget.
#[derive(Debug, Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    signer: Arc<dyn RequestSigner>,
    credentials: Credentials,
    retry_limit: RetryLimit,
    backoff: Arc<dyn BackoffStrategy>,
    cancel: CancellationToken,
}

impl Executor {
    /// Create an executor.
    pub fn new(
        transport: Arc<dyn Transport>,
        signer: Arc<dyn RequestSigner>,
        credentials: Credentials,
        retry_limit: RetryLimit,
        backoff: Arc<dyn BackoffStrategy>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            signer,
            credentials,
            retry_limit,
            backoff,
            cancel,
        }
    }

    /// The configured retry limit.
    pub fn retry_limit(&self) -> RetryLimit {
        self.retry_limit
    }

    /// Send `method url` with an optional JSON payload and decode the JSON answer.
    ///
    /// `retries` is the retry counter of the enclosing query. It is
    /// incremented once per retry and never exceeds the limit.
    ///
    /// # Errors
    ///
    /// - [`Error::Signing`] when the credentials are incomplete (never retried)
    /// - [`Error::RetryLimitExceeded`] once the retry budget is spent
    /// - [`Error::Cancelled`] when the session's cancellation token fires
    /// - [`Error::Serialization`] when the payload cannot be encoded
    ///
    /// An unreachable service is not an error: it is returned as
    /// [`Delivery::Unreachable`] without retrying.
    pub async fn execute(
        &self,
        method: Method,
        url: &Url,
        payload: Option<&Value>,
        retries: &mut u32,
    ) -> Result<Delivery<Value>> {
        let body = payload.map(serde_json::to_vec).transpose()?;

        let mut metadata = RequestMetadata::new(method.as_str(), url.as_str());
        if let Some(body) = &body {
            metadata = metadata.with_body_size(body.len());
        }

        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let mut headers = self
                .signer
                .sign(&method, url, body.as_deref(), &self.credentials)?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

            let request = OutgoingRequest {
                method: method.clone(),
                url: url.clone(),
                headers,
                body: body.clone(),
            };

            metadata.log_request(*retries);
            let timer = RequestTimer::start();

            let sent = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                sent = self.transport.send(request) => sent,
            };

            let failure = match sent {
                Ok(response) if response.status.is_success() => {
                    let outcome = ResponseMetadata::new(response.status.as_u16(), timer.elapsed())
                        .with_body_size(response.body.len())
                        .with_retries(*retries);
                    match serde_json::from_slice::<Value>(&response.body) {
                        Ok(value) => {
                            outcome.log_success(&metadata);
                            return Ok(Delivery::Delivered(value));
                        }
                        Err(e) => {
                            outcome.log_error(&metadata, &e.to_string());
                            TransientFailure::Decode(e.to_string())
                        }
                    }
                }
                Ok(response) => {
                    let body = String::from_utf8_lossy(&response.body);
                    let failure = TransientFailure::Status {
                        status: response.status.as_u16(),
                        body: truncate(&body, ERROR_BODY_LIMIT),
                    };
                    ResponseMetadata::new(response.status.as_u16(), timer.elapsed())
                        .with_retries(*retries)
                        .log_error(&metadata, &failure.to_string());
                    failure
                }
                Err(TransportError::Connect(message)) => {
                    metadata.log_unreachable(timer.elapsed(), &message);
                    return Ok(Delivery::Unreachable(ConnectionError::new(
                        url.as_str(),
                        message,
                    )));
                }
                Err(TransportError::Other(message)) => TransientFailure::Transport(message),
            };

            if !self.retry_limit.allows(*retries) {
                tracing::warn!(
                    url = %url,
                    limit = %self.retry_limit,
                    error = %failure,
                    "Retry limit exceeded"
                );
                return Err(Error::RetryLimitExceeded {
                    limit: self.retry_limit.bound().unwrap_or(u32::MAX),
                    last: failure,
                });
            }

            let delay = self.backoff.next_delay(*retries);
            *retries += 1;
            metadata.log_retry(*retries, delay, &failure.to_string());

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
