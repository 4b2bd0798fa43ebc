//! Testing utilities for Trellis.
//!
//! - [`RecordingFilter`]: a registration filter that records what it saw
//!   and can refuse selected names.

use crate::options::FilterContext;
use std::sync::{Arc, Mutex};

/// A filter that records every path it is asked about.
///
/// # Example
///
/// ```rust
/// use trellis_std::{Registry, RegistryOptions, testing::RecordingFilter};
///
/// let recorder = RecordingFilter::new().deny("secret");
/// let options = RegistryOptions::new().with_filter(recorder.filter());
/// let mut registry = Registry::new(options);
///
/// assert!(registry.service("srv").register_fn("open", 1u8).is_ok());
/// assert!(registry.service("srv").register_fn("secret", 2u8).is_err());
/// assert_eq!(recorder.seen(), ["/srv/open", "/srv/secret"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingFilter {
    seen: Arc<Mutex<Vec<String>>>,
    denied: Vec<String>,
}

impl RecordingFilter {
    /// A filter that admits everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse handlers with this name.
    pub fn deny(mut self, name: &str) -> Self {
        self.denied.push(name.to_string());
        self
    }

    /// The filter function to install in
    /// [`RegistryOptions::with_filter`](crate::RegistryOptions::with_filter).
    pub fn filter(&self) -> impl Fn(&FilterContext<'_>) -> bool + Send + Sync + 'static {
        let recorder = self.clone();
        move |ctx| {
            recorder.seen.lock().unwrap().push(ctx.path.to_string());
            !recorder.denied.iter().any(|name| name == ctx.name)
        }
    }

    /// Paths seen so far, in order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Shape;

    fn ctx<'a>(name: &'a str, path: &'a str) -> FilterContext<'a> {
        FilterContext {
            service: "srv",
            group: None,
            name,
            path,
            shape: Shape::of::<u8>(),
        }
    }

    #[test]
    fn test_records_and_denies() {
        let recorder = RecordingFilter::new().deny("hidden");
        let filter = recorder.filter();

        assert!(filter(&ctx("open", "/srv/open")));
        assert!(!filter(&ctx("hidden", "/srv/hidden")));
        assert_eq!(recorder.seen(), ["/srv/open", "/srv/hidden"]);

        recorder.clear();
        assert!(recorder.seen().is_empty());
    }
}
