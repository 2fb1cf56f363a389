//! Transport trait for abstracting the HTTP backend
//!
//! The executor signs, retries and decodes; the transport only moves bytes.
//! `ReqwestTransport` is the production implementation. Tests substitute
//! scripted transports to exercise failure paths without a network.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::error::{Error, Result};

/// A fully signed request ready to be sent.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL
    pub url: Url,
    /// Headers, including authorization and content type
    pub headers: HeaderMap,
    /// Serialized JSON body
    pub body: Option<Vec<u8>>,
}

/// The raw answer to an [`OutgoingRequest`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// Failures raised by a transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The service could not be reached: refused, DNS, TLS handshake, timeout.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else that broke the exchange.
    #[error("{0}")]
    Other(String),
}

/// Moves one signed request to the service and returns its raw response.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] when the service is unreachable and
    /// [`TransportError::Other`] for every other transport failure. Non-2xx
    /// statuses are *not* errors at this layer.
    async fn send(
        &self,
        request: OutgoingRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;

    /// Transport name for debugging/logging.
    fn name(&self) -> &'static str;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HttpClient`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("liveengage-rust/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_connect() || err.is_timeout() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: OutgoingRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method, request.url.as_str())
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(Self::classify)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(Self::classify)?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
