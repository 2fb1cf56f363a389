//! # LiveEngage history client
//!
//! Async Rust client for the LivePerson LiveEngage history APIs:
//! - Interaction (chat) and messaging conversation history search
//! - Cursor pagination forward and backward over large result sets
//! - OAuth 1.0a HMAC-SHA1 request signing
//! - Service domain discovery
//! - Bounded retry of transient failures
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use liveengage::{PageStep, Session, TimeWindow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::builder()
//!         .account("12345")
//!         .credentials("consumer-key", "consumer-secret", "token", "token-secret")
//!         .skills(["1001", "1002"])
//!         .build()?;
//!
//!     let mut history = session.interactions(TimeWindow::today()).await?.into_result()?;
//!     loop {
//!         match history.next().await? {
//!             PageStep::Advanced { .. } => continue,
//!             PageStep::Exhausted => break,
//!             PageStep::Unreachable(err) => return Err(err.into()),
//!         }
//!     }
//!
//!     for interaction in history.records() {
//!         if let Some(info) = &interaction.info {
//!             println!("{:?}: {:?} min", info.session_id(), info.minutes());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Unreachable service
//!
//! Failing to connect at all is not retried and not raised as an error.
//! Queries return [`Delivery::Unreachable`] and paging returns
//! [`PageStep::Unreachable`]; every other failure is retried up to the
//! session's [`RetryLimit`] and then surfaces as [`Error::RetryLimitExceeded`].

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use config::{Credentials, SessionConfig};
pub use error::{ConnectionError, Error, Result, TransientFailure};
pub use history::{History, PageStep, Query, ResultSet, TimeWindow, map_record};
pub use http::Delivery;
pub use session::{Session, SessionBuilder};
pub use signing::{OAuth1Signer, RequestSigner, SigningError};
pub use types::{
    Campaign, Conversation, HistoryKind, HistoryRecord, Interaction, ParticipantInfo, VisitorInfo,
};

pub use liveengage_core::retry::{
    BackoffStrategy, ExponentialBackoff, FixedBackoff, RetryLimit, RetryLimitError,
};

// Module declarations
pub mod config;
pub mod error;
pub mod history;
pub mod http;
pub mod observability;
pub mod resources;
pub mod session;
pub mod signing;
pub mod types;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use liveengage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Conversation, Delivery, Error, History, Interaction, PageStep, Query, Result, RetryLimit,
        Session, SessionConfig, TimeWindow,
    };
}

/// Crate version, from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL of the LivePerson domain discovery service
pub const DEFAULT_DISCOVERY_URL: &str = "https://api.liveperson.net";

/// API version sent to domain discovery
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Records requested per history page
pub const DEFAULT_PAGE_SIZE: u32 = 50;
