//! Visitor monitoring API

use http::Method;
use percent_encoding::utf8_percent_encode;
use serde::Serialize;
use serde_json::Value;

use super::MONITORING_SERVICE;
use crate::{error::Result, http::Delivery, session::Session, signing::OAUTH_ENCODE_SET};

/// Monitoring endpoints for one visitor's current visit.
#[derive(Debug, Clone)]
pub struct Visitor {
    session: Session,
    visitor_id: String,
    session_id: String,
}

impl Visitor {
    pub(crate) fn new(session: Session, visitor_id: String, session_id: String) -> Self {
        Self {
            session,
            visitor_id,
            session_id,
        }
    }

    /// Visitor id.
    pub fn visitor_id(&self) -> &str {
        &self.visitor_id
    }

    /// Current state of the visit.
    ///
    /// # Errors
    ///
    /// Fatal executor and domain resolution errors. An unreachable service is
    /// returned as [`Delivery::Unreachable`].
    pub async fn state(&self) -> Result<Delivery<Value>> {
        self.session
            .request_on(MONITORING_SERVICE, Method::GET, &self.path("state"), None)
            .await
    }

    /// Report engagement events for the visit.
    ///
    /// # Errors
    ///
    /// Same as [`state`](Self::state), plus [`Error::Serialization`](crate::Error::Serialization)
    /// if `events` cannot be encoded.
    pub async fn send_events<T: Serialize + ?Sized>(&self, events: &T) -> Result<Delivery<Value>> {
        let payload = serde_json::to_value(events)?;
        self.session
            .request_on(
                MONITORING_SERVICE,
                Method::POST,
                &self.path("events"),
                Some(&payload),
            )
            .await
    }

    fn path(&self, endpoint: &str) -> String {
        format!(
            "/api/account/{}/monitoring/visitors/{}/visits/current/{}?v=1&sid={}",
            utf8_percent_encode(self.session.account_id(), OAUTH_ENCODE_SET),
            utf8_percent_encode(&self.visitor_id, OAUTH_ENCODE_SET),
            endpoint,
            utf8_percent_encode(&self.session_id, OAUTH_ENCODE_SET)
        )
    }
}
