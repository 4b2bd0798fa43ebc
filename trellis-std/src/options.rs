//! Registry configuration.

use crate::handle::Shape;
use std::{fmt, sync::Arc};
use trellis_core::RouterConfig;

/// What a registration filter gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    /// Name of the registering service.
    pub service: &'a str,
    /// Method group, `None` for bare functions.
    pub group: Option<&'a str>,
    /// Function or method name as given.
    pub name: &'a str,
    /// Normalized path the handler would be registered under.
    pub path: &'a str,
    /// Declared type of the callable.
    pub shape: Shape,
}

/// A registration-time filter. Returning `false` rejects the handler.
pub type Filter = Arc<dyn Fn(&FilterContext<'_>) -> bool + Send + Sync>;

/// Options shared by every service of a [`Registry`](crate::Registry).
#[derive(Clone, Default)]
pub struct RegistryOptions {
    router: RouterConfig,
    filters: Vec<Filter>,
}

impl RegistryOptions {
    /// Default options: lowercase paths mounted at `/`, no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route table configuration.
    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.router = router;
        self
    }

    /// Append a filter. Filters run in the order they were added and the
    /// first refusal wins.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&FilterContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
        self
    }

    /// The route table configuration.
    pub fn router(&self) -> &RouterConfig {
        &self.router
    }

    pub(crate) fn admits(&self, ctx: &FilterContext<'_>) -> bool {
        self.filters.iter().all(|filter| filter(ctx))
    }
}

impl fmt::Debug for RegistryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryOptions")
            .field("router", &self.router)
            .field("filters", &self.filters.len())
            .finish()
    }
}
