//! Lenient field deserializers.
//!
//! The history APIs are inconsistent about numeric identifiers: the same
//! field arrives as `"12345"` in one record and `12345` in another.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Accept a string or a number, yielding its string form. `null` is `None`.
pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Accept a non-negative integer, an integral float, or a numeric string.
pub(crate) fn opt_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                Ok(Some(v))
            } else {
                match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(Some(f as u64))
                    }
                    _ => Err(D::Error::custom(format!(
                        "expected a non-negative whole number of seconds, found {n}"
                    ))),
                }
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected seconds, found {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected seconds, found {other}"
        ))),
    }
}
