//! Outcome of a call that may not reach the service.

use crate::error::{ConnectionError, Result};

/// Either the decoded payload, or word that the service could not be reached.
///
/// Connection-level failures are not retried and not raised as errors: they
/// come back as [`Delivery::Unreachable`] so callers can tell "could not
/// reach the service" apart from "the service failed" and branch explicitly.
/// Use [`into_result`](Self::into_result) to fold the two together.
#[must_use = "an unreachable service is reported as a value and must be checked"]
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    /// The request completed and produced a value.
    Delivered(T),
    /// The service could not be reached.
    Unreachable(ConnectionError),
}

impl<T> Delivery<T> {
    /// Convert into a `Result`, turning `Unreachable` into [`Error::Connection`](crate::Error::Connection).
    pub fn into_result(self) -> Result<T> {
        match self {
            Delivery::Delivered(value) => Ok(value),
            Delivery::Unreachable(err) => Err(err.into()),
        }
    }

    /// The delivered value, discarding a connection failure.
    pub fn delivered(self) -> Option<T> {
        match self {
            Delivery::Delivered(value) => Some(value),
            Delivery::Unreachable(_) => None,
        }
    }

    /// The connection failure, if any.
    pub fn unreachable(&self) -> Option<&ConnectionError> {
        match self {
            Delivery::Delivered(_) => None,
            Delivery::Unreachable(err) => Some(err),
        }
    }

    /// Whether the service could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Delivery::Unreachable(_))
    }

    /// Transform the delivered value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Delivery<U> {
        match self {
            Delivery::Delivered(value) => Delivery::Delivered(f(value)),
            Delivery::Unreachable(err) => Delivery::Unreachable(err),
        }
    }

    /// Borrow the delivered value.
    pub fn as_ref(&self) -> Delivery<&T> {
        match self {
            Delivery::Delivered(value) => Delivery::Delivered(value),
            Delivery::Unreachable(err) => Delivery::Unreachable(err.clone()),
        }
    }
}
