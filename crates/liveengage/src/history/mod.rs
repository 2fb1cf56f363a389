//! Cursor pagination over history search results
//!
//! [`Session::query`](crate::Session::query) returns a [`History`] holding the
//! first page. [`History::next`] and [`History::prev`] follow the server's
//! continuation links, appending each page to the same [`ResultSet`].

use std::sync::Weak;

use http::Method;

use crate::{
    error::{ConnectionError, Error, Result},
    http::Delivery,
    observability,
    session::SessionInner,
    types::HistoryRecord,
};

pub(crate) mod mapper;
mod query;
mod result_set;

pub use mapper::map_record;
pub use query::{Query, TimeWindow};
pub use result_set::ResultSet;

/// Outcome of one [`History::next`] or [`History::prev`] call.
#[must_use = "an unreachable service is reported as a value and must be checked"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// A page was fetched; `appended` records were added (possibly zero).
    Advanced {
        /// Records added by this page
        appended: usize,
    },
    /// No cursor in this direction. Nothing was requested.
    Exhausted,
    /// The service could not be reached. The cursor is kept for a later try.
    Unreachable(ConnectionError),
}

impl PageStep {
    /// Whether a page was fetched.
    pub fn is_advanced(&self) -> bool {
        matches!(self, PageStep::Advanced { .. })
    }

    /// Whether this direction is exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PageStep::Exhausted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Next,
    Prev,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Next => "next",
            Direction::Prev => "prev",
        }
    }
}

/// Records of one query plus the means to fetch more.
///
/// Holds only a weak reference to its session: dropping every [`Session`](crate::Session)
/// clone ends paging with [`Error::SessionReleased`].
#[derive(Debug)]
pub struct History<R> {
    session: Weak<SessionInner>,
    generation: u64,
    records: ResultSet<R>,
}

impl<R: HistoryRecord> History<R> {
    pub(crate) fn new(session: Weak<SessionInner>, generation: u64, records: ResultSet<R>) -> Self {
        Self {
            session,
            generation,
            records,
        }
    }

    /// Records fetched so far.
    pub fn records(&self) -> &ResultSet<R> {
        &self.records
    }

    /// Take the records, ending pagination.
    pub fn into_records(self) -> ResultSet<R> {
        self.records
    }

    /// Fetch the page after the last one and append it.
    ///
    /// Without a forward cursor this returns [`PageStep::Exhausted`] and
    /// neither touches the network nor changes any state.
    ///
    /// # Errors
    ///
    /// - [`Error::SessionReleased`] if the session was dropped
    /// - [`Error::QuerySuperseded`] if a newer query ran on the session
    /// - any fatal executor or mapping error
    pub async fn next(&mut self) -> Result<PageStep> {
        self.step(Direction::Next).await
    }

    /// Fetch the page before the first one and append it.
    ///
    /// Mirrors [`next`](Self::next) using the backward cursor.
    ///
    /// # Errors
    ///
    /// Same as [`next`](Self::next).
    pub async fn prev(&mut self) -> Result<PageStep> {
        self.step(Direction::Prev).await
    }

    async fn step(&mut self, direction: Direction) -> Result<PageStep> {
        let inner = self.session.upgrade().ok_or(Error::SessionReleased)?;
        let mut state = inner.state.lock().await;
        if state.generation != self.generation {
            return Err(Error::QuerySuperseded);
        }

        let cursor = match direction {
            Direction::Next => state.next.clone(),
            Direction::Prev => state.prev.clone(),
        };
        let Some(cursor) = cursor else {
            return Ok(PageStep::Exhausted);
        };
        let payload = state.payload.clone();

        let body = match inner
            .executor
            .execute(Method::POST, &cursor, payload.as_ref(), &mut state.retries)
            .await?
        {
            Delivery::Delivered(body) => body,
            Delivery::Unreachable(err) => return Ok(PageStep::Unreachable(err)),
        };

        let page = mapper::map_page::<R>(body)?;
        match direction {
            Direction::Next => state.next = page.next,
            Direction::Prev => state.prev = page.prev,
        }

        let appended = page.records.len();
        self.records.extend(page.records);
        observability::log_page(
            R::KIND.as_str(),
            direction.as_str(),
            appended,
            state.next.is_some(),
            state.prev.is_some(),
        );

        Ok(PageStep::Advanced { appended })
    }
}
