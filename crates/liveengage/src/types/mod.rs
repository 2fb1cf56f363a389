//! Typed history records and the blocks nested inside them.

use serde::de::DeserializeOwned;
use std::fmt;

mod campaign;
mod conversation;
mod de;
mod info;
mod interaction;
mod visitor;

pub use campaign::Campaign;
pub use conversation::Conversation;
pub use info::ParticipantInfo;
pub use interaction::Interaction;
pub use visitor::VisitorInfo;

/// Which history API a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    /// Chat engagements (`interaction_history`)
    Interaction,
    /// Messaging conversations (`messaging_history`)
    Conversation,
}

impl HistoryKind {
    /// Service name passed to domain discovery.
    pub fn service(self) -> &'static str {
        match self {
            HistoryKind::Interaction => "engHistDomain",
            HistoryKind::Conversation => "msgHist",
        }
    }

    /// Name of the record array in a search response.
    pub fn records_field(self) -> &'static str {
        match self {
            HistoryKind::Interaction => "interactionHistoryRecords",
            HistoryKind::Conversation => "conversationHistoryRecords",
        }
    }

    /// Path of the search endpoint for an account.
    pub fn search_path(self, account_id: &str) -> String {
        match self {
            HistoryKind::Interaction => {
                format!("/interaction_history/api/account/{account_id}/interactions/search")
            }
            HistoryKind::Conversation => {
                format!("/messaging_history/api/account/{account_id}/conversations/search")
            }
        }
    }

    /// Short lowercase name, used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryKind::Interaction => "interaction",
            HistoryKind::Conversation => "conversation",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type that a history search can produce.
pub trait HistoryRecord: DeserializeOwned + Send + Sync + 'static {
    /// The API this record comes from.
    const KIND: HistoryKind;

    /// The record's `info` block, if it had one.
    fn info(&self) -> Option<&ParticipantInfo>;
}
