//! Error types for route registration.
//!
//! Lookups never fail: an unmatched path yields an empty candidate list.
//! Everything here is returned synchronously from registration and is
//! non-fatal; the caller decides whether to abort or skip.

use thiserror::Error;

/// Errors returned when registering a pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// An equivalent pattern is already bound to a handle.
    #[error("route already exists: {0}")]
    DuplicateRoute(String),

    /// A wildcard segment appears before the final position.
    #[error("wildcard must be the last segment: {0}")]
    WildcardNotAtEnd(String),

    /// The pattern normalized to nothing where a concrete name was required.
    #[error("route pattern is empty")]
    EmptyPattern,

    /// The pattern is deeper than the router accepts.
    #[error("route {pattern} has more than {limit} segments")]
    TooManySegments {
        /// The normalized pattern.
        pattern: String,
        /// The configured depth cap.
        limit: usize,
    },
}

impl RouteError {
    /// Returns true for [`RouteError::DuplicateRoute`].
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RouteError::DuplicateRoute(_))
    }
}
