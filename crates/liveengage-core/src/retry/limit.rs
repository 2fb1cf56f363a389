//! Retry budget for one query.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while interpreting a retry limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryLimitError {
    /// A negative limit other than the `-1` sentinel.
    #[error("retry limit must be a non-negative integer or -1 for unlimited, got {0}")]
    Negative(i64),

    /// The value does not fit the retry counter.
    #[error("retry limit {0} is too large")]
    TooLarge(i64),

    /// The text is not an integer.
    #[error("retry limit is not an integer: {0:?}")]
    NotANumber(String),
}

/// How many retries a query may spend after its initial attempt.
///
/// `Limited(3)` allows up to 4 requests in total. `Unlimited` keeps retrying
/// until the request succeeds, the failure is not retryable, or the session
/// is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryLimit {
    /// At most this many retries.
    Limited(u32),
    /// Retry indefinitely.
    Unlimited,
}

impl RetryLimit {
    /// The signed sentinel meaning "retry indefinitely".
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Interpret a signed limit where `-1` means unlimited.
    ///
    /// # Errors
    ///
    /// Returns [`RetryLimitError::Negative`] for any other negative value and
    /// [`RetryLimitError::TooLarge`] for values above `u32::MAX`.
    pub fn from_signed(value: i64) -> Result<Self, RetryLimitError> {
        match value {
            Self::UNLIMITED_SENTINEL => Ok(Self::Unlimited),
            v if v < 0 => Err(RetryLimitError::Negative(v)),
            v => u32::try_from(v)
                .map(Self::Limited)
                .map_err(|_| RetryLimitError::TooLarge(v)),
        }
    }

    /// Whether another retry is allowed after `retries_spent` retries.
    pub fn allows(&self, retries_spent: u32) -> bool {
        match self {
            Self::Limited(limit) => retries_spent < *limit,
            Self::Unlimited => true,
        }
    }

    /// The bound, or `None` when unlimited.
    pub fn bound(&self) -> Option<u32> {
        match self {
            Self::Limited(limit) => Some(*limit),
            Self::Unlimited => None,
        }
    }

    /// The limit as its signed configuration value.
    pub fn as_signed(&self) -> i64 {
        match self {
            Self::Limited(limit) => i64::from(*limit),
            Self::Unlimited => Self::UNLIMITED_SENTINEL,
        }
    }
}

impl Default for RetryLimit {
    fn default() -> Self {
        Self::Limited(5)
    }
}

impl fmt::Display for RetryLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(limit) => write!(f, "{limit}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl FromStr for RetryLimit {
    type Err = RetryLimitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| RetryLimitError::NotANumber(s.to_string()))?;
        Self::from_signed(value)
    }
}

impl TryFrom<i64> for RetryLimit {
    type Error = RetryLimitError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_signed(value)
    }
}

impl From<u32> for RetryLimit {
    fn from(value: u32) -> Self {
        Self::Limited(value)
    }
}
