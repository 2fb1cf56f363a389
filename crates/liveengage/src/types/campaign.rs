use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::opt_string_or_number;

/// The `campaign` block of a history record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Campaign id
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign_id: Option<String>,

    /// Campaign name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,

    /// Engagement id within the campaign
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign_engagement_id: Option<String>,

    /// Engagement name within the campaign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_engagement_name: Option<String>,

    /// Campaign goal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_name: Option<String>,

    /// Fields without a typed accessor
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
