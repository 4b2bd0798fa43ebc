//! The handler registry.
//!
//! Services register handles during startup through [`Registry::service`];
//! afterwards the registry is read-only and can be shared freely.
//!
//! # Example
//!
//! ```rust
//! use trellis_std::{MethodSet, Registry, RegistryOptions, register_fn};
//!
//! struct Player;
//!
//! impl Player {
//!     fn login(&self, user: &str) -> String {
//!         format!("welcome {user}")
//!     }
//! }
//!
//! type Ping = fn() -> &'static str;
//! type Login = fn(&Player, &str) -> String;
//!
//! fn ping() -> &'static str {
//!     "pong"
//! }
//!
//! let mut registry = Registry::new(RegistryOptions::new());
//! let mut game = registry.service("game");
//! register_fn!(game, ping as Ping).unwrap();
//! game.register_methods(MethodSet::new(Player).method("Login", Player::login as Login))
//!     .unwrap();
//!
//! let ping = registry.resolve_fn::<Ping>("/Game/Ping").unwrap();
//! assert_eq!((ping.target)(), "pong");
//!
//! let login = registry.resolve_method::<Player, Login>("/game/player/login").unwrap();
//! let (player, f) = login.target;
//! assert_eq!(f(player, "ann"), "welcome ann");
//! ```

use crate::{
    error::RegistryError,
    handle::Handle,
    options::RegistryOptions,
    service::{Service, ServiceMut},
};
use std::{any::Any, collections::BTreeMap, sync::Arc};
use trellis_core::{Candidate, Params, Pattern, Router};

/// A resolved handler, ready to call.
#[derive(Debug)]
pub struct Resolved<'a, T> {
    /// The handle that matched.
    pub handle: &'a Handle,
    /// The typed view of the handle the caller asked for.
    pub target: T,
    /// The pattern the handle was registered under.
    pub pattern: &'a Pattern,
    /// Parameters bound from the request path.
    pub params: Params,
}

/// Services and the route table they register into.
#[derive(Debug)]
pub struct Registry {
    pub(crate) options: RegistryOptions,
    pub(crate) router: Router<Arc<Handle>>,
    pub(crate) services: BTreeMap<String, Service>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryOptions::default())
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new(options: RegistryOptions) -> Self {
        Self {
            router: Router::with_config(options.router().clone()),
            options,
            services: BTreeMap::new(),
        }
    }

    /// Get or create the service named `name`.
    pub fn service(&mut self, name: &str) -> ServiceMut<'_> {
        let prefix = self.router.normalizer().clean(name);
        if !self.services.contains_key(&prefix) {
            #[cfg(feature = "tracing")]
            tracing::debug!(service = %prefix, "service created");
            self.services
                .insert(prefix.clone(), Service::new(prefix.clone()));
        }
        ServiceMut::new(self, prefix)
    }

    /// Look up a service.
    pub fn get(&self, name: &str) -> Option<&Service> {
        self.services.get(&self.router.normalizer().clean(name))
    }

    /// Returns true if the service exists.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if there are no services.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// All services, ordered by prefix.
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// The underlying route table.
    pub fn router(&self) -> &Router<Arc<Handle>> {
        &self.router
    }

    /// Move every service and handle of `other` into this registry.
    ///
    /// Paths are re-registered through this registry's route table, so a path
    /// both registries cover fails with a duplicate route error. Handles
    /// merged before the failure stay registered.
    pub fn merge(&mut self, other: Registry) -> Result<(), RegistryError> {
        for (_, service) in other.services {
            let (prefix, groups, entries) = service.into_parts();
            let key = self.router.normalizer().clean(&prefix);
            let target = self
                .services
                .entry(key.clone())
                .or_insert_with(|| Service::new(key));

            for group in groups {
                target.add_group(group);
            }
            for (path, handle) in entries {
                self.router.register(&path, Arc::clone(&handle))?;
                target.add_entry(self.router.normalizer().clean(&path), handle);
            }
        }
        Ok(())
    }

    /// Every route covering `path`, most specific first.
    pub fn find(&self, path: &str) -> Vec<Candidate<'_, Arc<Handle>>> {
        self.router.find(path)
    }

    /// The service owning the most specific route for `path`.
    pub fn service_of(&self, path: &str) -> Option<&Service> {
        let candidate = self.router.find(path).into_iter().next()?;
        let owner = candidate.handle().service();
        self.services.values().find(|s| s.name() == owner)
    }

    /// The first function handle of type `F` covering `path`.
    pub fn resolve_fn<F: Any>(&self, path: &str) -> Option<Resolved<'_, &F>> {
        self.resolve(path, |handle| handle.downcast::<F>())
    }

    /// The first method of receiver `R` with type `F` covering `path`.
    pub fn resolve_method<R: Any, F: Any>(&self, path: &str) -> Option<Resolved<'_, (&R, &F)>> {
        self.resolve(path, |handle| handle.downcast_method::<R, F>())
    }

    /// Walk the candidates for `path` most specific first and return the
    /// first one `pick` accepts.
    pub fn resolve<'a, T>(
        &'a self,
        path: &str,
        pick: impl Fn(&'a Handle) -> Option<T>,
    ) -> Option<Resolved<'a, T>> {
        let normalized = self.router.normalizer().clean(path);
        let found = self.router.find(&normalized);

        #[cfg(feature = "tracing")]
        tracing::trace!(path = %normalized, candidates = found.len(), "resolving handler");

        found.into_iter().find_map(|candidate| {
            let handle: &'a Handle = candidate.handle().as_ref();
            pick(handle).map(|target| Resolved {
                handle,
                target,
                pattern: candidate.pattern(),
                params: candidate.params(&normalized),
            })
        })
    }

    /// Register every handler submitted with [`inventory::submit!`].
    ///
    /// Returns the number of submissions applied.
    #[cfg(feature = "inventory")]
    pub fn collect_submitted(&mut self) -> Result<usize, RegistryError> {
        let mut count = 0;
        for submission in inventory::iter::<crate::submit::Submission>() {
            let mut service = self.service(submission.service);
            (submission.register)(&mut service)?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handle::MethodSet, options::FilterContext};
    use trellis_core::{Normalizer, RouteError, RouterConfig};

    type Unary = fn(&str) -> String;
    type Nullary = fn() -> u32;

    fn echo(input: &str) -> String {
        input.to_string()
    }

    fn answer() -> u32 {
        42
    }

    struct Store;

    impl Store {
        fn get(&self, key: &str) -> String {
            format!("value of {key}")
        }
    }

    type StoreGet = fn(&Store, &str) -> String;

    #[test]
    fn test_service_get_or_create() {
        let mut registry = Registry::default();
        registry.service("/Srv/");
        registry.service("srv");

        assert_eq!(registry.len(), 1);
        assert!(registry.has("SRV"));
        let service = registry.get("srv").unwrap();
        assert_eq!(service.name(), "srv");
        assert_eq!(service.prefix(), "/srv");
        assert!(service.is_empty());
    }

    #[test]
    fn test_register_and_resolve_fn() {
        let mut registry = Registry::default();
        registry
            .service("srv")
            .register_fn("Echo", echo as Unary)
            .unwrap();
        crate::register_fn!(registry.service("srv"), answer as Nullary).unwrap();

        let echo = registry.resolve_fn::<Unary>("/srv/echo").unwrap();
        assert_eq!((echo.target)("hi"), "hi");
        assert_eq!(echo.handle.name(), "Echo");
        assert!(echo.params.is_empty());

        let answer = registry.resolve_fn::<Nullary>("/srv/answer").unwrap();
        assert_eq!((answer.target)(), 42);

        // Wrong shape for the path.
        assert!(registry.resolve_fn::<Nullary>("/srv/echo").is_none());
        assert_eq!(registry.get("srv").unwrap().paths(), ["/srv/echo", "/srv/answer"]);
    }

    #[test]
    fn test_template_and_params() {
        let mut registry = Registry::default();
        registry
            .service("files")
            .register_fn_at(Some("%v/:id/*rest"), "Read", echo as Unary)
            .unwrap();

        let resolved = registry.resolve_fn::<Unary>("/files/read/7/a/b").unwrap();
        assert_eq!(resolved.pattern.as_str(), "/files/read/:id/*rest");
        assert_eq!(resolved.params.get("id"), Some("7"));
        assert_eq!(resolved.params.get("rest"), Some("a/b"));
    }

    #[test]
    fn test_fall_through_to_usable_shape() {
        let mut registry = Registry::default();
        registry
            .service("api")
            .register_fn_at(Some(":name"), "status", answer as Nullary)
            .unwrap()
            .register_fn_at(Some("*rest"), "lookup", echo as Unary)
            .unwrap();

        // The parameter route is more specific but has the wrong shape.
        let resolved = registry.resolve_fn::<Unary>("/api/status").unwrap();
        assert_eq!(resolved.handle.name(), "lookup");
        assert_eq!(resolved.params.get("rest"), Some("status"));

        let resolved = registry.resolve_fn::<Nullary>("/api/status").unwrap();
        assert_eq!(resolved.handle.name(), "status");
        assert_eq!(resolved.params.get("name"), Some("status"));
    }

    #[test]
    fn test_methods() {
        let mut registry = Registry::default();
        registry
            .service("kv")
            .register_methods(MethodSet::new(Store).method("Get", Store::get as StoreGet))
            .unwrap();

        let resolved = registry
            .resolve_method::<Store, StoreGet>("/kv/store/get")
            .unwrap();
        let (store, get) = resolved.target;
        assert_eq!(get(store, "k"), "value of k");
        assert!(registry.resolve_fn::<StoreGet>("/kv/store/get").is_none());
        assert_eq!(registry.get("kv").unwrap().groups(), ["/kv/store"]);
    }

    #[test]
    fn test_duplicate_group() {
        let mut registry = Registry::default();
        let mut service = registry.service("kv");
        service.register_methods(MethodSet::new(Store)).unwrap();
        let err = service
            .register_methods(MethodSet::new(Store))
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::DuplicateName("/kv/store".to_string()));
    }

    #[test]
    fn test_failed_group_commits_nothing() {
        let mut registry = Registry::default();
        let mut service = registry.service("kv");
        service.register_fn("store/get", answer as Nullary).unwrap();

        let err = service
            .register_methods(
                MethodSet::new(Store)
                    .method("count", Store::get as StoreGet)
                    .method("get", Store::get as StoreGet),
            )
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::Route(RouteError::DuplicateRoute("/kv/store/get".to_string()))
        );
        assert!(service.service().groups().is_empty());
        assert_eq!(service.service().paths(), ["/kv/store/get"]);
        assert!(!registry.router().contains("/kv/store/count"));

        registry
            .service("kv")
            .register_methods(MethodSet::new(Store).method("count", Store::get as StoreGet))
            .unwrap();
        assert_eq!(registry.get("kv").unwrap().groups(), ["/kv/store"]);
        assert!(
            registry
                .resolve_method::<Store, StoreGet>("/kv/store/count")
                .is_some()
        );
    }

    #[test]
    fn test_group_with_clashing_methods_commits_nothing() {
        let mut registry = Registry::default();
        let err = registry
            .service("kv")
            .register_methods(
                MethodSet::new(Store)
                    .method("Get", Store::get as StoreGet)
                    .method("get", Store::get as StoreGet),
            )
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::Route(RouteError::DuplicateRoute("/kv/store/get".to_string()))
        );
        assert!(registry.get("kv").unwrap().is_empty());
        assert!(registry.router().is_empty());
    }

    #[test]
    fn test_empty_name() {
        let mut registry = Registry::default();
        let err = registry
            .service("srv")
            .register_fn("/", answer as Nullary)
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::Route(RouteError::EmptyPattern));
    }

    #[test]
    fn test_duplicate_route() {
        let mut registry = Registry::default();
        registry.service("srv").register_fn("a", answer as Nullary).unwrap();
        let err = registry
            .service("srv")
            .register_fn("A", answer as Nullary)
            .err()
            .unwrap();
        assert_eq!(
            err,
            RegistryError::Route(RouteError::DuplicateRoute("/srv/a".to_string()))
        );
        assert_eq!(registry.get("srv").unwrap().len(), 1);
    }

    #[test]
    fn test_filters() {
        let options = RegistryOptions::new()
            .with_filter(|ctx: &FilterContext<'_>| !ctx.name.starts_with('_'))
            .with_filter(|ctx: &FilterContext<'_>| ctx.service != "closed");
        let mut registry = Registry::new(options);

        let err = registry
            .service("srv")
            .register_fn("_hidden", answer as Nullary)
            .err()
            .unwrap();
        assert_eq!(err, RegistryError::Filtered("/srv/_hidden".to_string()));

        registry
            .service("srv")
            .register_methods(
                MethodSet::new(Store)
                    .method("get", Store::get as StoreGet)
                    .method("_internal", Store::get as StoreGet),
            )
            .unwrap();
        assert_eq!(registry.get("srv").unwrap().paths(), ["/srv/store/get"]);

        assert!(registry.service("closed").register_fn("x", answer as Nullary).is_err());
    }

    #[test]
    fn test_service_of() {
        let mut registry = Registry::default();
        registry.service("a").register_fn("x", answer as Nullary).unwrap();
        registry.service("b").register_fn("y", answer as Nullary).unwrap();

        assert_eq!(registry.service_of("/b/y").unwrap().name(), "b");
        assert!(registry.service_of("/c").is_none());
    }

    #[test]
    fn test_merge() {
        let mut left = Registry::default();
        left.service("a").register_fn("x", answer as Nullary).unwrap();

        let mut right = Registry::default();
        right.service("a").register_fn("y", answer as Nullary).unwrap();
        right.service("b").register_fn("z", echo as Unary).unwrap();

        left.merge(right).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.get("a").unwrap().paths(), ["/a/x", "/a/y"]);
        assert!(left.resolve_fn::<Unary>("/b/z").is_some());

        let mut clash = Registry::default();
        clash.service("a").register_fn("x", answer as Nullary).unwrap();
        assert!(matches!(
            left.merge(clash),
            Err(RegistryError::Route(RouteError::DuplicateRoute(_)))
        ));
    }

    #[test]
    fn test_root_prefix_option() {
        let options = RegistryOptions::new().with_router(
            RouterConfig::default().with_normalizer(Normalizer::new().with_root_prefix("/rpc")),
        );
        let mut registry = Registry::new(options);
        registry.service("srv").register_fn("ping", answer as Nullary).unwrap();

        assert_eq!(registry.get("srv").unwrap().prefix(), "/rpc/srv");
        assert!(registry.resolve_fn::<Nullary>("/rpc/srv/ping").is_some());
        assert!(registry.resolve_fn::<Nullary>("srv/ping").is_some());
    }
}
