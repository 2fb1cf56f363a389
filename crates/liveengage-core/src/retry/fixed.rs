//! Constant-delay backoff.

use super::strategy::BackoffStrategy;
use std::time::Duration;

/// Waits the same short pause before every retry.
///
/// The default pause is 1.5 ms: retries are near-immediate and never grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    /// Default pause between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_micros(1500);

    /// Create a backoff that always waits `delay`.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Backoff with no pause at all.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The configured pause.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl BackoffStrategy for FixedBackoff {
    fn next_delay(&self, _attempt: u32) -> Duration {
        self.delay
    }
}
