//! Registry errors.

use thiserror::Error;
use trellis_core::RouteError;

/// Errors returned while registering handlers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The route table rejected the pattern.
    #[error("routing error: {0}")]
    Route(#[from] RouteError),

    /// A registration filter refused the handler.
    #[error("registration rejected by filter: {0}")]
    Filtered(String),

    /// A method group with this path already exists in the service.
    #[error("method group already registered: {0}")]
    DuplicateName(String),
}
