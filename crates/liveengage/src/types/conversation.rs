//! Messaging conversation records from the messaging history API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Campaign, HistoryKind, HistoryRecord, ParticipantInfo, VisitorInfo};

/// One record of `conversationHistoryRecords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ParticipantInfo>,

    /// Consumer details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_info: Option<VisitorInfo>,

    /// Campaign that triggered the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Campaign>,

    /// Message records, participants and every other top-level field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Conversation {
    /// Conversation id from the `info` block.
    pub fn conversation_id(&self) -> Option<&str> {
        self.info.as_ref()?.conversation_id.as_deref()
    }
}

impl HistoryRecord for Conversation {
    const KIND: HistoryKind = HistoryKind::Conversation;

    fn info(&self) -> Option<&ParticipantInfo> {
        self.info.as_ref()
    }
}
