//! The backoff strategy trait.

use std::fmt;
use std::time::Duration;

/// Decides how long to wait before re-issuing a failed request.
///
/// The strategy only supplies delays. Whether another attempt is allowed at
/// all is decided by [`RetryLimit`](super::RetryLimit), so the same strategy
/// can be shared between bounded and unlimited sessions.
///
/// # Examples
///
/// ```rust
/// use liveengage_core::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Linear(Duration);
///
/// impl BackoffStrategy for Linear {
///     fn next_delay(&self, attempt: u32) -> Duration {
///         self.0 * (attempt + 1)
///     }
/// }
///
/// assert_eq!(Linear(Duration::from_millis(5)).next_delay(2), Duration::from_millis(15));
/// ```
pub trait BackoffStrategy: Send + Sync + fmt::Debug {
    /// Delay before the retry that follows failed attempt number `attempt`.
    ///
    /// `attempt` is 0-indexed: `next_delay(0)` is the pause between the
    /// initial request and the first retry.
    fn next_delay(&self, attempt: u32) -> Duration;
}
