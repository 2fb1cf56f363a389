//! Chat interaction records from the interaction history API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Campaign, HistoryKind, HistoryRecord, ParticipantInfo, VisitorInfo};

/// One record of `interactionHistoryRecords`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Engagement metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<ParticipantInfo>,

    /// Who the visitor was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_info: Option<VisitorInfo>,

    /// Campaign that triggered the engagement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Campaign>,

    /// Transcript, surveys and every other top-level field
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl HistoryRecord for Interaction {
    const KIND: HistoryKind = HistoryKind::Interaction;

    fn info(&self) -> Option<&ParticipantInfo> {
        self.info.as_ref()
    }
}
