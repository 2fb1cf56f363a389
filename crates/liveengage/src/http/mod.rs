//! HTTP layer: transport seam, signed request execution with retry, and the
//! [`Delivery`] value that reports unreachable services.

pub use delivery::Delivery;
pub use executor::Executor;
pub use transport::{
    OutgoingRequest, ReqwestTransport, Transport, TransportError, TransportResponse,
};

mod delivery;
mod executor;
pub mod transport;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
