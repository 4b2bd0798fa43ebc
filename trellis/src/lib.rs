//! # trellis - Path-Pattern Handler Registry
//!
//! `trellis` maps slash-separated paths to handlers. Fully literal routes
//! live in a hash index; routes with `:param` or `*wildcard` segments live
//! in a trie searched most specific first.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! type Greet = fn(&str) -> String;
//!
//! fn greet(name: &str) -> String {
//!     format!("hello {name}")
//! }
//!
//! let mut registry = Registry::default();
//! registry
//!     .service("chat")
//!     .register_fn_at(Some("%v/:name"), "Greet", greet as Greet)?;
//!
//! let resolved = registry.resolve_fn::<Greet>("/chat/greet/Ann").unwrap();
//! let name = resolved.params.get("name").unwrap();
//! assert_eq!((resolved.target)(name), "hello ann");
//! # Ok::<(), trellis::TrellisError>(())
//! ```
//!
//! The route table can also be used on its own:
//!
//! ```rust
//! use trellis::Router;
//!
//! let mut router = Router::new();
//! router.register("/users/:id", "user")?;
//! router.register("/users/*rest", "fallback")?;
//!
//! let found: Vec<_> = router.find("/users/7").iter().map(|c| *c.handle()).collect();
//! assert_eq!(found, ["user", "fallback"]);
//! # Ok::<(), trellis::RouteError>(())
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

use thiserror::Error;

pub use trellis_core::{
    // Route table
    Candidate,
    // Normalization
    CaseFolding,
    DEFAULT_MAX_DEPTH,
    Normalizer,
    // Patterns
    PARAM_MARKER,
    Params,
    Pattern,
    Route,
    // Errors
    RouteError,
    Router,
    RouterConfig,
    Segment,
    SegmentKey,
    WILDCARD_MARKER,
    segments,
};

pub use trellis_std::{
    Filter,
    FilterContext,
    FunctionHandle,
    // Handles
    Handle,
    MethodHandle,
    MethodSet,
    // Registry
    Registry,
    RegistryError,
    RegistryOptions,
    Resolved,
    Service,
    ServiceMut,
    Shape,
    register_fn,
};

#[cfg(feature = "inventory")]
pub use trellis_std::{Submission, inventory};

/// Handler naming helpers.
pub mod naming {
    pub use trellis_std::naming::{NAME_PLACEHOLDER, format_name, short_type_name};
}

/// Testing utilities.
pub mod testing {
    pub use trellis_std::testing::RecordingFilter;
}

/// Any error Trellis can return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrellisError {
    /// The route table rejected a pattern.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// The registry rejected a handler.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Prelude module - common imports for Trellis.
///
/// # Usage
///
/// ```rust
/// use trellis::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Handle, MethodSet, Normalizer, Params, Registry, RegistryOptions, Resolved, RouteError,
        Router, RouterConfig, TrellisError, register_fn,
    };
}
