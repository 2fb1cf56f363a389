use http::Method;
use serde::Serialize;
use serde_json::Value;

use super::MESSAGING_SERVICE;
use crate::{error::Result, http::Delivery, session::Session};

/// Agent status for the session's skill filter.
#[derive(Debug, Clone)]
pub struct AgentStatus {
    session: Session,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusRequest<'a> {
    skill_ids: &'a [String],
}

impl AgentStatus {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// POST `{skillIds}` to the agent-view status endpoint.
    ///
    /// The skill list is always sent, empty or not.
    ///
    /// # Errors
    ///
    /// Fatal executor and domain resolution errors. An unreachable service is
    /// returned as [`Delivery::Unreachable`].
    pub async fn fetch(&self) -> Result<Delivery<Value>> {
        let payload = serde_json::to_value(StatusRequest {
            skill_ids: &self.session.config().skill_ids,
        })?;
        let path = format!(
            "/messaging_history/api/account/{}/agent-view/status",
            self.session.account_id()
        );
        self.session
            .request_on(MESSAGING_SERVICE, Method::POST, &path, Some(&payload))
            .await
    }
}
