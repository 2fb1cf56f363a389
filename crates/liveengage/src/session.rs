//! The session: configuration, domain resolution and query state
//!
//! A [`Session`] is cheap to clone; clones share one domain slot, one query
//! state and one cancellation token.

use std::sync::Arc;
use std::time::Duration;

use http::Method;
use liveengage_core::retry::{BackoffStrategy, RetryLimit};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    config::{Credentials, SessionConfig},
    error::{Error, Result},
    history::{History, Query, TimeWindow, mapper},
    http::{Delivery, Executor, ReqwestTransport, Transport},
    observability,
    resources::{AgentStatus, Visitor},
    signing::{OAuth1Signer, RequestSigner},
    types::{Conversation, HistoryKind, HistoryRecord, Interaction},
};

/// A configured LiveEngage client for one account.
///
/// Holds the resolved service domain, the signing credentials and the
/// cursor/retry state of the most recent history query. One request is in
/// flight per session at a time: `query`, `next` and `prev` serialize on the
/// query state.
///
/// # Example
///
/// ```rust,no_run
/// use liveengage::{Session, TimeWindow};
///
/// # async fn example() -> liveengage::Result<()> {
/// let session = Session::builder()
///     .account("12345")
///     .credentials("key", "secret", "token", "token-secret")
///     .build()?;
///
/// let mut history = session.interactions(TimeWindow::today()).await?.into_result()?;
/// while history.next().await?.is_advanced() {}
/// println!("{} interactions", history.records().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

#[derive(Debug)]
pub(crate) struct SessionInner {
    pub(crate) config: SessionConfig,
    pub(crate) executor: Executor,
    /// Single domain slot, shared by every service
    domain: Mutex<Option<String>>,
    pub(crate) state: Mutex<QueryState>,
    cancel: CancellationToken,
}

/// Cursor and retry state of the query in effect.
#[derive(Debug, Default)]
pub(crate) struct QueryState {
    pub(crate) kind: Option<HistoryKind>,
    pub(crate) window: Option<TimeWindow>,
    pub(crate) payload: Option<Value>,
    pub(crate) next: Option<Url>,
    pub(crate) prev: Option<Url>,
    pub(crate) retries: u32,
    pub(crate) generation: u64,
}

impl Session {
    /// Create a session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Create a session from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: SessionConfig) -> Result<Self> {
        SessionBuilder::from_config(config).build()
    }

    /// Create a session from `LIVEENGAGE_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::from_env`].
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(SessionConfig::from_env()?)
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Account id of the session.
    pub fn account_id(&self) -> &str {
        &self.inner.config.account_id
    }

    /// The service domain currently cached, if any.
    pub async fn domain(&self) -> Option<String> {
        self.inner.domain.lock().await.clone()
    }

    /// Retries spent by the query in effect.
    pub async fn retry_attempts(&self) -> u32 {
        self.inner.state.lock().await.retries
    }

    /// Kind and window of the query in effect, if one has run.
    pub async fn active_query(&self) -> Option<(HistoryKind, TimeWindow)> {
        let state = self.inner.state.lock().await;
        state.kind.zip(state.window)
    }

    /// Token that aborts in-flight requests and retry pauses when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.cancel.clone()
    }

    /// Cancel every in-flight and future request of this session.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
    }

    /// Look up the base URI of `service` and store it as the session domain.
    ///
    /// Always performs the lookup, replacing any cached domain.
    ///
    /// # Errors
    ///
    /// - [`Error::DomainResolution`] if the discovery service is unreachable or
    ///   its answer has no `baseURI`
    /// - [`Error::RetryLimitExceeded`] if every retry failed
    pub async fn resolve_domain(&self, service: &str) -> Result<String> {
        let mut slot = self.inner.domain.lock().await;
        let mut retries = 0;
        let domain = self.inner.discover(service, &mut retries).await?;
        *slot = Some(domain.clone());
        Ok(domain)
    }

    /// The cached domain, resolving it through `service` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_domain`](Self::resolve_domain).
    pub async fn ensure_domain(&self, service: &str) -> Result<String> {
        let mut retries = 0;
        self.inner.ensure_domain(service, &mut retries).await
    }

    /// Run a history search and return its first page.
    ///
    /// Resets the retry counter, replaces the cursors of any earlier query
    /// and resolves the domain on first use. Histories returned by earlier
    /// queries on this session stop paging with [`Error::QuerySuperseded`].
    ///
    /// # Errors
    ///
    /// Fatal failures (signing, retry exhaustion, domain resolution,
    /// malformed payloads, cancellation) are errors. An unreachable search
    /// endpoint is returned as [`Delivery::Unreachable`].
    pub async fn query<R: HistoryRecord>(
        &self,
        query: impl Into<Query>,
    ) -> Result<Delivery<History<R>>> {
        let query = query.into();
        let kind = R::KIND;
        let payload = serde_json::to_value(query.payload(&self.inner.config.skill_ids))?;

        let mut state = self.inner.state.lock().await;
        state.generation += 1;
        state.retries = 0;
        state.kind = Some(kind);
        state.window = Some(query.window());
        state.payload = Some(payload.clone());
        state.next = None;
        state.prev = None;
        let generation = state.generation;

        tracing::debug!(
            kind = %kind,
            generation,
            from = %query.window().start(),
            to = %query.window().end(),
            "Starting history query"
        );

        let domain = self
            .inner
            .ensure_domain(kind.service(), &mut state.retries)
            .await?;
        let url = self.inner.search_url(&domain, kind)?;

        let body = match self
            .inner
            .executor
            .execute(Method::POST, &url, Some(&payload), &mut state.retries)
            .await?
        {
            Delivery::Delivered(body) => body,
            Delivery::Unreachable(err) => return Ok(Delivery::Unreachable(err)),
        };

        let page = mapper::map_page::<R>(body)?;
        state.next = page.next;
        state.prev = page.prev;
        observability::log_page(
            kind.as_str(),
            "query",
            page.records.len(),
            state.next.is_some(),
            state.prev.is_some(),
        );

        Ok(Delivery::Delivered(History::new(
            Arc::downgrade(&self.inner),
            generation,
            page.records.into(),
        )))
    }

    /// Search interaction (chat) history.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub async fn interactions(
        &self,
        window: impl Into<Query>,
    ) -> Result<Delivery<History<Interaction>>> {
        self.query(window).await
    }

    /// Search messaging conversation history.
    ///
    /// # Errors
    ///
    /// See [`query`](Self::query).
    pub async fn conversations(
        &self,
        window: impl Into<Query>,
    ) -> Result<Delivery<History<Conversation>>> {
        self.query(window).await
    }

    /// Monitoring endpoints for one visitor session.
    pub fn visitor(&self, visitor_id: impl Into<String>, session_id: impl Into<String>) -> Visitor {
        Visitor::new(self.clone(), visitor_id.into(), session_id.into())
    }

    /// Agent status for the session's skills.
    ///
    /// # Errors
    ///
    /// See [`AgentStatus::fetch`].
    pub async fn agent_status(&self) -> Result<Delivery<Value>> {
        AgentStatus::new(self.clone()).fetch().await
    }

    /// Send a signed request to the service domain with a fresh retry budget.
    pub(crate) async fn request_on(
        &self,
        service: &str,
        method: Method,
        path_and_query: &str,
        payload: Option<&Value>,
    ) -> Result<Delivery<Value>> {
        let mut retries = 0;
        let domain = self.inner.ensure_domain(service, &mut retries).await?;
        let url = self.inner.domain_url(&domain, path_and_query)?;
        self.inner
            .executor
            .execute(method, &url, payload, &mut retries)
            .await
    }
}

impl SessionInner {
    async fn ensure_domain(&self, service: &str, retries: &mut u32) -> Result<String> {
        let mut slot = self.domain.lock().await;
        if let Some(domain) = slot.as_ref() {
            return Ok(domain.clone());
        }
        let domain = self.discover(service, retries).await?;
        *slot = Some(domain.clone());
        Ok(domain)
    }

    async fn discover(&self, service: &str, retries: &mut u32) -> Result<String> {
        let config = &self.config;
        let url = format!(
            "{}/api/account/{}/service/{}/baseURI.json?version={}",
            config.discovery_url.trim_end_matches('/'),
            config.account_id,
            service,
            config.api_version
        );
        let url = Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        let resolution_failed = |reason: String| Error::DomainResolution {
            service: service.to_string(),
            reason,
        };

        let body = match self.executor.execute(Method::GET, &url, None, retries).await? {
            Delivery::Delivered(body) => body,
            Delivery::Unreachable(err) => return Err(resolution_failed(err.to_string())),
        };

        match body.get("baseURI").and_then(Value::as_str) {
            Some(domain) if !domain.trim().is_empty() => {
                let domain = domain.trim().to_string();
                tracing::info!(service, domain = %domain, "Resolved service domain");
                Ok(domain)
            }
            _ => Err(resolution_failed(
                "discovery response has no baseURI".to_string(),
            )),
        }
    }

    fn search_url(&self, domain: &str, kind: HistoryKind) -> Result<Url> {
        self.domain_url(
            domain,
            &format!(
                "{}?limit={}&offset=0",
                kind.search_path(&self.config.account_id),
                self.config.page_size
            ),
        )
    }

    fn domain_url(&self, domain: &str, path_and_query: &str) -> Result<Url> {
        let url = format!("{}://{}{}", self.config.scheme, domain, path_and_query);
        Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))
    }
}

/// Builder for [`Session`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    transport: Option<Arc<dyn Transport>>,
    signer: Option<Arc<dyn RequestSigner>>,
    cancel: Option<CancellationToken>,
}

impl SessionBuilder {
    /// Start from an existing configuration.
    pub fn from_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Set the account id.
    pub fn account(mut self, account_id: impl Into<String>) -> Self {
        self.config.account_id = account_id.into();
        self
    }

    /// Set the four OAuth1 secrets.
    pub fn credentials(
        mut self,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        self.config.credentials =
            Credentials::new(consumer_key, consumer_secret, token, token_secret);
        self
    }

    /// Set the four OAuth1 secrets from a prepared [`Credentials`].
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Use a known service domain and skip discovery.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = Some(domain.into());
        self
    }

    /// API version sent to discovery.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Records per history page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Default skill filter.
    pub fn skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skill_ids = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Retry budget per query.
    pub fn retry_limit(mut self, limit: RetryLimit) -> Self {
        self.config.retry_limit = limit;
        self
    }

    /// Pause between retries.
    pub fn backoff(mut self, backoff: impl BackoffStrategy + 'static) -> Self {
        self.config.backoff = Arc::new(backoff);
        self
    }

    /// Per-request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Base URL of the discovery service.
    pub fn discovery_url(mut self, url: impl Into<String>) -> Self {
        self.config.discovery_url = url.into();
        self
    }

    /// Scheme used for resolved domains.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.config.scheme = scheme.into();
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the request signer.
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Use an external cancellation token.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the default
    /// transport cannot be created.
    pub fn build(self) -> Result<Session> {
        let Self {
            config,
            transport,
            signer,
            cancel,
        } = self;

        config.validate()?;

        let transport = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout)?),
        };
        let signer = signer.unwrap_or_else(|| Arc::new(OAuth1Signer::new()));
        let cancel = cancel.unwrap_or_default();

        let executor = Executor::new(
            transport,
            signer,
            config.credentials.clone(),
            config.retry_limit,
            config.backoff.clone(),
            cancel.clone(),
        );

        let domain = config
            .domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        Ok(Session {
            inner: Arc::new(SessionInner {
                config,
                executor,
                domain: Mutex::new(domain),
                state: Mutex::new(QueryState::default()),
                cancel,
            }),
        })
    }
}
