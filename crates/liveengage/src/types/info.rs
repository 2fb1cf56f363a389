//! Participant info attached to every history record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::{opt_seconds, opt_string_or_number};

/// The `info` block of an interaction or conversation record.
///
/// Derived values (`session_id`, `minutes`, `hours`, `start_time`) are
/// computed on read from the raw fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    /// Engagement id; prefixed with the account id in interaction history
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub engagement_id: Option<String>,

    /// Conversation id (messaging history)
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<String>,

    /// Account the record belongs to
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_id: Option<String>,

    /// Start time as sent by the service
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time_raw: Option<String>,

    /// Start time in epoch milliseconds
    #[serde(rename = "startTimeL", default, skip_serializing_if = "Option::is_none")]
    pub start_time_millis: Option<i64>,

    /// Duration in seconds
    #[serde(
        default,
        deserialize_with = "opt_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<u64>,

    /// Every other field of the block, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParticipantInfo {
    /// Engagement id with the account id removed.
    ///
    /// `12345abcde` under account `12345` becomes `abcde`. Every occurrence
    /// is removed, so `99912345` becomes `999`. When the account id does not
    /// occur in the engagement id it is returned unchanged.
    pub fn session_id(&self) -> Option<String> {
        let engagement_id = self.engagement_id.as_deref()?;
        match self.account_id.as_deref() {
            Some(account) if !account.is_empty() => Some(engagement_id.replace(account, "")),
            _ => Some(engagement_id.to_string()),
        }
    }

    /// Duration in seconds.
    pub fn seconds(&self) -> Option<u64> {
        self.duration
    }

    /// Duration in minutes, rounded half up to two decimals.
    pub fn minutes(&self) -> Option<f64> {
        self.duration.map(|secs| hundredths(centi_minutes(secs)))
    }

    /// Duration in hours, rounded to two decimals.
    ///
    /// Derived from the already rounded [`minutes`](Self::minutes), so the
    /// rounding compounds: 125 s is 2.08 min and 0.03 h.
    pub fn hours(&self) -> Option<f64> {
        self.duration
            .map(|secs| hundredths(div_round_half_up(centi_minutes(secs), 60)))
    }

    /// Start time, parsed.
    ///
    /// Accepts RFC 3339 and the service's `2016-08-29 15:06:44.000+0000`
    /// layout, falling back to `startTimeL`.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time_raw
            .as_deref()
            .and_then(parse_service_time)
            .or_else(|| {
                self.start_time_millis
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
            })
    }
}

// Integer hundredths keep decimal halves such as 0.135 h exact.
fn centi_minutes(secs: u64) -> u128 {
    div_round_half_up(u128::from(secs) * 100, 60)
}

fn div_round_half_up(numerator: u128, denominator: u128) -> u128 {
    (numerator * 2 + denominator) / (denominator * 2)
}

fn hundredths(value: u128) -> f64 {
    value as f64 / 100.0
}

fn parse_service_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, layout) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn info(value: Value) -> ParticipantInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_duration_chain_rounding() {
        let info = info(json!({"duration": 125}));
        assert_eq!(info.seconds(), Some(125));
        assert_eq!(info.minutes(), Some(2.08));
        assert_eq!(info.hours(), Some(0.03));
    }

    #[rstest]
    #[case(0, 0.0, 0.0)]
    #[case(60, 1.0, 0.02)]
    #[case(3600, 60.0, 1.0)]
    #[case(5400, 90.0, 1.5)]
    #[case(89, 1.48, 0.02)]
    fn test_duration_table(#[case] secs: u64, #[case] minutes: f64, #[case] hours: f64) {
        let info = info(json!({"duration": secs}));
        assert_eq!(info.minutes(), Some(minutes));
        assert_eq!(info.hours(), Some(hours));
    }

    #[rstest]
    #[case(486, 8.1, 0.14)]
    #[case(522, 8.7, 0.15)]
    #[case(702, 11.7, 0.2)]
    #[case(1422, 23.7, 0.4)]
    #[case(1998, 33.3, 0.56)]
    #[case(2034, 33.9, 0.57)]
    fn test_hours_round_decimal_halves_up(
        #[case] secs: u64,
        #[case] minutes: f64,
        #[case] hours: f64,
    ) {
        let info = info(json!({"duration": secs}));
        assert_eq!(info.minutes(), Some(minutes));
        assert_eq!(info.hours(), Some(hours));
    }

    #[test]
    fn test_hours_match_decimal_rounding_of_minutes() {
        for secs in 0..20_000u64 {
            let centi = (secs * 200 + 60) / 120;
            let expected = ((centi * 2 + 60) / 120) as f64 / 100.0;
            let info = info(json!({"duration": secs}));
            assert_eq!(info.hours(), Some(expected), "duration {secs}");
        }
    }

    #[test]
    fn test_huge_duration_does_not_overflow() {
        let info = info(json!({"duration": u64::MAX}));
        assert!(info.hours().unwrap() > 0.0);
    }

    #[test]
    fn test_missing_duration() {
        let info = info(json!({}));
        assert_eq!(info.seconds(), None);
        assert_eq!(info.minutes(), None);
        assert_eq!(info.hours(), None);
    }

    #[rstest]
    #[case("12345", "12345abcde", "abcde")]
    #[case("12345", "xyz", "xyz")]
    #[case("", "12345abcde", "12345abcde")]
    fn test_session_id(#[case] account: &str, #[case] engagement: &str, #[case] expected: &str) {
        let info = info(json!({"accountId": account, "engagementId": engagement}));
        assert_eq!(info.session_id().as_deref(), Some(expected));
    }

    #[rstest]
    #[case("12345", "99912345", "999")]
    #[case("12345", "1234512345x", "x")]
    fn test_session_id_removes_every_occurrence(
        #[case] account: &str,
        #[case] engagement: &str,
        #[case] expected: &str,
    ) {
        let info = info(json!({"accountId": account, "engagementId": engagement}));
        assert_eq!(info.session_id().as_deref(), Some(expected));
    }

    #[test]
    fn test_session_id_numeric_fields() {
        let info = info(json!({"accountId": 12345, "engagementId": "12345987"}));
        assert_eq!(info.session_id().as_deref(), Some("987"));
    }

    #[test]
    fn test_session_id_without_engagement() {
        assert_eq!(info(json!({"accountId": "1"})).session_id(), None);
    }

    #[test]
    fn test_start_time_service_layout() {
        let info = info(json!({"startTime": "2016-08-29 15:06:44.000+0000"}));
        assert_eq!(
            info.start_time(),
            Some(Utc.with_ymd_and_hms(2016, 8, 29, 15, 6, 44).unwrap())
        );
    }

    #[test]
    fn test_start_time_rfc3339_and_millis_fallback() {
        let rfc = info(json!({"startTime": "2020-01-02T03:04:05+01:00"}));
        assert_eq!(
            rfc.start_time(),
            Some(Utc.with_ymd_and_hms(2020, 1, 2, 2, 4, 5).unwrap())
        );

        let millis = info(json!({"startTime": "garbage", "startTimeL": 1_472_483_204_000i64}));
        assert_eq!(
            millis.start_time(),
            Some(Utc.with_ymd_and_hms(2016, 8, 29, 15, 6, 44).unwrap())
        );
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let info = info(json!({"agentName": "Ada", "duration": 5}));
        assert_eq!(info.extra.get("agentName"), Some(&json!("Ada")));
        assert!(!info.extra.contains_key("duration"));
    }
}
