//! # trellis-std
//!
//! Handler registry for the Trellis routing core.
//!
//! This crate provides:
//! - **Handles**: [`Handle`], a tagged function/method callable with a [`Shape`]
//! - **Services**: named handler groups sharing a path prefix
//! - **Registry**: [`Registry`], registration at startup and typed resolution at serve time
//! - **Filters**: ordered registration-time callbacks via [`RegistryOptions`]
//! - **Collection**: `inventory`-based submission (feature `inventory`)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use trellis_core;

// Modules
mod error;
pub mod handle;
pub mod naming;
mod options;
pub mod registry;
pub mod service;
#[cfg(feature = "inventory")]
pub mod submit;
pub mod testing;

pub use error::RegistryError;
pub use handle::{FunctionHandle, Handle, MethodHandle, MethodSet, Shape};
pub use options::{Filter, FilterContext, RegistryOptions};
pub use registry::{Registry, Resolved};
pub use service::{Service, ServiceMut};
#[cfg(feature = "inventory")]
pub use submit::Submission;

#[cfg(feature = "inventory")]
pub use inventory;

/// Register a function item under its own name.
///
/// `register_fn!(service, ping as Ping)` is
/// `service.register_fn("ping", ping as Ping)`.
#[macro_export]
macro_rules! register_fn {
    ($service:expr, $f:ident as $ty:ty) => {
        $service.register_fn(stringify!($f), $f as $ty)
    };
}
