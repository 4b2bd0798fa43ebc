//! Link-time handler collection.
//!
//! Handlers are submitted from anywhere in the program with
//! [`inventory::submit!`] and applied in one go by
//! [`Registry::collect_submitted`](crate::Registry::collect_submitted).
//!
//! # Example
//!
//! ```rust,ignore
//! type Ping = fn() -> &'static str;
//!
//! fn ping() -> &'static str {
//!     "pong"
//! }
//!
//! inventory::submit! {
//!     Submission::new("game", |svc| svc.register_fn("ping", ping as Ping).map(drop))
//! }
//!
//! let mut registry = Registry::default();
//! registry.collect_submitted()?;
//! ```

use crate::{error::RegistryError, service::ServiceMut};

/// Registers one or more handlers into a service.
pub type RegisterFn = fn(&mut ServiceMut<'_>) -> Result<(), RegistryError>;

/// A handler registration submitted for collection.
pub struct Submission {
    /// Name of the service to register into.
    pub service: &'static str,
    /// Performs the registration.
    pub register: RegisterFn,
}

impl Submission {
    /// Create a submission.
    pub const fn new(service: &'static str, register: RegisterFn) -> Self {
        Self { service, register }
    }
}

inventory::collect!(Submission);
