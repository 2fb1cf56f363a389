use std::ops::Index;

use crate::types::HistoryRecord;

/// Records accumulated by a query and its subsequent pages, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<R> {
    records: Vec<R>,
}

impl<R> ResultSet<R> {
    /// An empty result set.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// The records as a slice.
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// First record, if any.
    pub fn first(&self) -> Option<&R> {
        self.records.first()
    }

    /// Take the records.
    pub fn into_vec(self) -> Vec<R> {
        self.records
    }
}

impl<R: HistoryRecord> ResultSet<R> {
    /// The first record whose derived session id equals `session_id`.
    pub fn find_by_session_id(&self, session_id: &str) -> Option<&R> {
        self.records.iter().find(|record| {
            record
                .info()
                .and_then(|info| info.session_id())
                .is_some_and(|sid| sid == session_id)
        })
    }
}

impl<R> Default for ResultSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> From<Vec<R>> for ResultSet<R> {
    fn from(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R> Extend<R> for ResultSet<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<R> Index<usize> for ResultSet<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.records[index]
    }
}

impl<R> IntoIterator for ResultSet<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a ResultSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
