//! Retry limits and backoff strategies.
//!
//! # Key Types
//!
//! - [`RetryLimit`] - how many retries a query may spend
//! - [`BackoffStrategy`] - how long to pause before the next attempt
//! - [`FixedBackoff`] - constant delay
//! - [`ExponentialBackoff`] - exponential delay with jitter
//!
//! # Examples
//!
//! ```rust
//! use liveengage_core::retry::{BackoffStrategy, ExponentialBackoff, RetryLimit};
//! use std::time::Duration;
//!
//! let limit = RetryLimit::Limited(3);
//! let backoff = ExponentialBackoff::builder()
//!     .initial_delay(Duration::from_millis(100))
//!     .jitter(0.0)
//!     .build();
//!
//! let mut attempts = 0;
//! while limit.allows(attempts) {
//!     let _pause = backoff.next_delay(attempts);
//!     attempts += 1;
//! }
//! assert_eq!(attempts, 3);
//! ```

mod exponential;
mod fixed;
mod limit;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fixed::FixedBackoff;
pub use limit::{RetryLimit, RetryLimitError};
pub use strategy::BackoffStrategy;
