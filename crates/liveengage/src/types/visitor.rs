use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::opt_string_or_number;

/// The `visitorInfo` block of a history record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorInfo {
    /// Visitor id
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub visitor_id: Option<String>,

    /// Name the visitor gave, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visitor_name: Option<String>,

    /// Browser description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,

    /// Device type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Visitor IP address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Country
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Fields without a typed accessor
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
