#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core retry primitives for the LiveEngage client crates.
//!
//! The HTTP executor in `liveengage` owns its retry loop (it needs to tell
//! connection failures apart from transient ones and share one attempt
//! counter across the pages of a query). This crate supplies the pieces that
//! loop is parameterized by:
//!
//! - [`RetryLimit`](retry::RetryLimit): a bounded retry count, or unlimited
//! - [`BackoffStrategy`](retry::BackoffStrategy): the pause before the next attempt
//!   - [`FixedBackoff`](retry::FixedBackoff): constant near-immediate delay (the default)
//!   - [`ExponentialBackoff`](retry::ExponentialBackoff): growing delay with jitter
//!
//! # Examples
//!
//! ```rust
//! use liveengage_core::prelude::*;
//! use std::time::Duration;
//!
//! let limit = RetryLimit::from_signed(-1).unwrap();
//! assert!(limit.allows(10_000));
//!
//! let backoff = FixedBackoff::new(Duration::from_millis(2));
//! assert_eq!(backoff.next_delay(7), Duration::from_millis(2));
//! ```

pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use liveengage_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::retry::{
        BackoffStrategy, ExponentialBackoff, ExponentialBackoffBuilder, FixedBackoff, RetryLimit,
        RetryLimitError,
    };
}
