//! Search windows and the payload sent to the search endpoints.

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// Inclusive range of engagement start times to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] if `end` precedes `start`.
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if end < start {
            return Err(Error::InvalidWindow(format!(
                "end {} is before start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// The current local calendar day, 00:00 to 23:59.
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        let start = local_instant(today.and_time(NaiveTime::MIN));
        let end = today
            .and_hms_opt(23, 59, 0)
            .map(local_instant)
            .unwrap_or(start);
        Self { start, end }
    }

    /// The `days` local calendar days ending with today.
    pub fn last_days(days: u32) -> Self {
        let today = Self::today();
        let first = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .map(|day| local_instant(day.and_time(NaiveTime::MIN)))
            .unwrap_or(today.start);
        Self {
            start: first,
            end: today.end,
        }
    }

    /// Window start.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Window end.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::today()
    }
}

// Ambiguous local times (DST fold) take the earlier instant; skipped ones fall back to UTC.
fn local_instant(naive: chrono::NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// A history search: a window and an optional skill filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    window: TimeWindow,
    skill_ids: Option<Vec<String>>,
}

impl Query {
    /// Search `window` with the session's skill filter.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            skill_ids: None,
        }
    }

    /// Search today with the session's skill filter.
    pub fn today() -> Self {
        Self::new(TimeWindow::today())
    }

    /// Restrict the search to these skills, replacing the session's filter.
    ///
    /// An empty list searches every skill.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skill_ids = Some(skills.into_iter().map(Into::into).collect());
        self
    }

    /// The window searched.
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// The skill override, if one was set.
    pub fn skill_ids(&self) -> Option<&[String]> {
        self.skill_ids.as_deref()
    }

    pub(crate) fn payload(&self, session_skills: &[String]) -> SearchPayload {
        let skill_ids = self
            .skill_ids
            .clone()
            .unwrap_or_else(|| session_skills.to_vec());
        SearchPayload {
            interactive: true,
            ended: true,
            start: SearchRange {
                from: epoch_millis(self.window.start),
                to: epoch_millis(self.window.end),
            },
            skill_ids,
        }
    }
}

impl From<TimeWindow> for Query {
    fn from(window: TimeWindow) -> Self {
        Self::new(window)
    }
}

/// Whole seconds followed by `000`, as a string.
fn epoch_millis(instant: DateTime<Utc>) -> String {
    format!("{}000", instant.timestamp())
}

/// Body of a history search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPayload {
    pub interactive: bool,
    pub ended: bool,
    pub start: SearchRange,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skill_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SearchRange {
    pub from: String,
    pub to: String,
}
