//! Turns raw search responses into typed pages.

use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{HistoryKind, HistoryRecord};

/// One decoded search response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Page<R> {
    pub records: Vec<R>,
    pub next: Option<Url>,
    pub prev: Option<Url>,
}

/// Map one raw record into its typed entity.
///
/// Nested `info`, `visitorInfo` and `campaign` blocks are typed when present;
/// everything else is kept as JSON.
///
/// # Errors
///
/// Returns [`Error::MalformedRecord`] if `raw` is not an object or a known
/// field has the wrong JSON type.
pub fn map_record<R: HistoryRecord>(raw: Value) -> Result<R> {
    map_record_at(0, raw)
}

fn map_record_at<R: HistoryRecord>(index: usize, raw: Value) -> Result<R> {
    if !raw.is_object() {
        return Err(Error::MalformedRecord {
            index,
            reason: format!("expected an object, found {}", json_type(&raw)),
        });
    }
    serde_json::from_value(raw).map_err(|e| Error::MalformedRecord {
        index,
        reason: e.to_string(),
    })
}

/// Map a search response body for `R`'s history kind.
///
/// A missing or `null` record array is an empty page. Cursors come from
/// `_metadata.next.href` and `_metadata.prev.href`.
pub(crate) fn map_page<R: HistoryRecord>(body: Value) -> Result<Page<R>> {
    let kind = R::KIND;
    let mut body = match body {
        Value::Object(body) => body,
        other => {
            return Err(Error::MalformedResponse(format!(
                "{kind} search returned {} instead of an object",
                json_type(&other)
            )));
        }
    };

    let raw_records = match body.remove(kind.records_field()) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "'{}' is {} instead of an array",
                kind.records_field(),
                json_type(&other)
            )));
        }
    };

    let records = raw_records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| map_record_at(index, raw))
        .collect::<Result<Vec<R>>>()?;

    let metadata = body.get("_metadata");
    Ok(Page {
        records,
        next: cursor(kind, metadata, "next")?,
        prev: cursor(kind, metadata, "prev")?,
    })
}

fn cursor(kind: HistoryKind, metadata: Option<&Value>, direction: &str) -> Result<Option<Url>> {
    let Some(href) = metadata
        .and_then(|m| m.get(direction))
        .and_then(|link| link.get("href"))
    else {
        return Ok(None);
    };
    match href {
        Value::Null => Ok(None),
        Value::String(href) => Url::parse(href).map(Some).map_err(|e| {
            Error::MalformedResponse(format!("{kind} {direction} link '{href}': {e}"))
        }),
        other => Err(Error::MalformedResponse(format!(
            "{kind} {direction} link is {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
