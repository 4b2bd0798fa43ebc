//! Services: named groups of handlers sharing a path prefix.

use crate::{
    error::RegistryError,
    handle::{Handle, MethodSet, Shape},
    naming::format_name,
    options::FilterContext,
    registry::Registry,
};
use std::{any::Any, sync::Arc};
use trellis_core::RouteError;

/// A service and everything it registered.
#[derive(Debug, Clone)]
pub struct Service {
    name: String,
    prefix: String,
    groups: Vec<String>,
    entries: Vec<(String, Arc<Handle>)>,
}

impl Service {
    pub(crate) fn new(prefix: String) -> Self {
        Self {
            name: prefix.trim_start_matches('/').to_string(),
            prefix,
            groups: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Service name: the prefix without its leading `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized path prefix, `""` for the root service.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every path this service registered, in registration order.
    pub fn paths(&self) -> Vec<&str> {
        self.entries.iter().map(|(path, _)| path.as_str()).collect()
    }

    /// Paths of the method groups.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Registered `(path, handle)` pairs.
    pub fn handles(&self) -> impl Iterator<Item = (&str, &Handle)> {
        self.entries
            .iter()
            .map(|(path, handle)| (path.as_str(), handle.as_ref()))
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn has_group(&self, path: &str) -> bool {
        self.groups.iter().any(|g| g == path)
    }

    pub(crate) fn add_group(&mut self, path: String) {
        if !self.has_group(&path) {
            self.groups.push(path);
        }
    }

    pub(crate) fn add_entry(&mut self, path: String, handle: Arc<Handle>) {
        self.entries.push((path, handle));
    }

    pub(crate) fn into_parts(self) -> (String, Vec<String>, Vec<(String, Arc<Handle>)>) {
        (self.prefix, self.groups, self.entries)
    }
}

/// Mutable access to one service of a [`Registry`].
///
/// Obtained from [`Registry::service`]. Every method registers into the
/// registry's route table immediately and returns `self` for chaining.
pub struct ServiceMut<'a> {
    registry: &'a mut Registry,
    key: String,
}

impl<'a> ServiceMut<'a> {
    pub(crate) fn new(registry: &'a mut Registry, key: String) -> Self {
        Self { registry, key }
    }

    /// The service being registered into.
    pub fn service(&self) -> &Service {
        &self.registry.services[&self.key]
    }

    /// Register `callable` at `<prefix>/<name>`.
    pub fn register_fn<F: Any + Send + Sync>(
        &mut self,
        name: &str,
        callable: F,
    ) -> Result<&mut Self, RegistryError> {
        self.register_fn_at(None, name, callable)
    }

    /// Register `callable` at `<prefix>/<template>`, with `%v` in the
    /// template replaced by the lowercased `name`.
    pub fn register_fn_at<F: Any + Send + Sync>(
        &mut self,
        template: Option<&str>,
        name: &str,
        callable: F,
    ) -> Result<&mut Self, RegistryError> {
        let Registry {
            options,
            router,
            services,
        } = &mut *self.registry;
        let service = services
            .entry(self.key.clone())
            .or_insert_with(|| Service::new(self.key.clone()));

        let path = router
            .normalizer()
            .normalize([service.prefix(), format_name(template, name).as_str()]);
        if path == service.prefix() {
            return Err(RouteError::EmptyPattern.into());
        }

        let ctx = FilterContext {
            service: service.name(),
            group: None,
            name,
            path: &path,
            shape: Shape::of::<F>(),
        };
        if !options.admits(&ctx) {
            #[cfg(feature = "tracing")]
            tracing::warn!(service = %service.name(), path = %path, "function rejected by filter");
            return Err(RegistryError::Filtered(path));
        }

        let handle = Arc::new(Handle::function(service.name(), name, callable));
        router.register(&path, Arc::clone(&handle))?;
        service.add_entry(path, handle);
        Ok(self)
    }

    /// Register every method of `set` at `<prefix>/<group>/<method>`.
    pub fn register_methods<R: Any + Send + Sync>(
        &mut self,
        set: MethodSet<R>,
    ) -> Result<&mut Self, RegistryError> {
        self.register_methods_at(None, set)
    }

    /// Register every method of `set` at `<prefix>/<template>/<method>`,
    /// with `%v` in the template replaced by the lowercased group name.
    ///
    /// Methods a filter refuses are skipped, not reported as errors. If any
    /// admitted method cannot be routed, nothing from the group is
    /// registered and the group can be registered again once corrected.
    pub fn register_methods_at<R: Any + Send + Sync>(
        &mut self,
        template: Option<&str>,
        set: MethodSet<R>,
    ) -> Result<&mut Self, RegistryError> {
        let Registry {
            options,
            router,
            services,
        } = &mut *self.registry;
        let service = services
            .entry(self.key.clone())
            .or_insert_with(|| Service::new(self.key.clone()));

        let group = set.name().to_string();
        let group_path = router
            .normalizer()
            .normalize([service.prefix(), format_name(template, &group).as_str()]);
        if group_path == service.prefix() {
            return Err(RouteError::EmptyPattern.into());
        }
        if service.has_group(&group_path) {
            return Err(RegistryError::DuplicateName(group_path));
        }

        let service_name = service.name().to_string();
        let mut admitted: Vec<(String, Arc<Handle>)> = Vec::new();
        for (method, handle) in set.into_handles(&service_name, &group) {
            let path = router.normalizer().normalize([group_path.as_str(), method.as_str()]);
            let ctx = FilterContext {
                service: &service_name,
                group: Some(&group),
                name: &method,
                path: &path,
                shape: handle.shape(),
            };
            if !options.admits(&ctx) {
                #[cfg(feature = "tracing")]
                tracing::debug!(service = %service_name, path = %path, "method skipped by filter");
                continue;
            }

            router.check(&path)?;
            if admitted.iter().any(|(seen, _)| *seen == path) {
                return Err(RouteError::DuplicateRoute(path).into());
            }
            admitted.push((path, Arc::new(handle)));
        }

        // Nothing is committed until every method is known to insert.
        service.add_group(group_path);
        for (path, handle) in admitted {
            router.register(&path, Arc::clone(&handle))?;
            service.add_entry(path, handle);
        }

        Ok(self)
    }
}
