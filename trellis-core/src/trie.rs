//! Two-tier route table.
//!
//! Fully literal patterns live in a hash index keyed by their normalized
//! text, so the common case is a single lookup. Patterns with parameters or
//! a wildcard live in a segment trie that is searched depth first with an
//! explicit backtracking stack.
//!
//! # Candidate order
//!
//! [`Router::find`] returns every registered pattern that covers a path,
//! most specific first:
//!
//! 1. a static match, which short-circuits the trie entirely;
//! 2. literal children before parameters before wildcards at each level;
//! 3. among fallbacks of equal kind, the nearer (deeper) branch first.
//!
//! # Example
//!
//! ```rust
//! use trellis_core::Router;
//!
//! let mut router = Router::new();
//! router.register("/users/me", "me").unwrap();
//! router.register("/users/:id", "by_id").unwrap();
//! router.register("/users/*rest", "fallback").unwrap();
//!
//! let found = router.find("/users/42");
//! let handles: Vec<_> = found.iter().map(|c| *c.handle()).collect();
//! assert_eq!(handles, ["by_id", "fallback"]);
//! assert_eq!(found[0].params("/users/42").get("id"), Some("42"));
//! ```

use crate::{
    error::RouteError,
    normalize::{Normalizer, segments},
    params::Params,
    pattern::{Pattern, Segment, SegmentKey},
};
use std::collections::{HashMap, hash_map::Entry};

/// Default cap on the number of segments in a registered pattern.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Construction options for a [`Router`].
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Normalizer applied to patterns and request paths alike.
    pub normalizer: Normalizer,
    /// Maximum number of segments a pattern may have.
    pub max_depth: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RouterConfig {
    /// Set the normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A registered pattern together with its handle.
#[derive(Debug)]
pub struct Route<H> {
    pattern: Pattern,
    handle: H,
}

impl<H> Route<H> {
    /// The pattern as it was normalized at registration.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The registered handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// One trie position.
#[derive(Debug)]
struct Node<H> {
    depth: usize,
    key: SegmentKey,
    literals: HashMap<String, Node<H>>,
    param: Option<Box<Node<H>>>,
    wildcard: Option<Box<Node<H>>>,
    /// Present iff a registered pattern ends here.
    route: Option<Route<H>>,
}

impl<H> Node<H> {
    fn new(depth: usize, key: SegmentKey) -> Self {
        Self {
            depth,
            key,
            literals: HashMap::new(),
            param: None,
            wildcard: None,
            route: None,
        }
    }

    fn child(&self, segment: &Segment) -> Option<&Node<H>> {
        match segment {
            Segment::Literal(value) => self.literals.get(value),
            Segment::Param(_) => self.param.as_deref(),
            Segment::Wildcard(_) => self.wildcard.as_deref(),
        }
    }

    fn child_or_insert(&mut self, segment: &Segment) -> &mut Node<H> {
        let depth = self.depth + 1;
        let key = segment.key();
        let slot = match segment {
            Segment::Literal(value) => {
                return self.literals.entry(value.clone()).or_insert_with(|| {
                    log_node_created(depth, &key);
                    Node::new(depth, key)
                });
            }
            Segment::Param(_) => &mut self.param,
            Segment::Wildcard(_) => &mut self.wildcard,
        };
        slot.get_or_insert_with(|| {
            log_node_created(depth, &key);
            Box::new(Node::new(depth, key))
        })
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Route<H>>) {
        if let Some(route) = &self.route {
            out.push(route);
        }
        let mut literals: Vec<_> = self.literals.iter().collect();
        literals.sort_by(|a, b| a.0.cmp(b.0));
        for (_, child) in literals {
            child.collect(out);
        }
        for child in [&self.param, &self.wildcard].into_iter().flatten() {
            child.collect(out);
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_node_created(depth: usize, key: &SegmentKey) {
    #[cfg(feature = "tracing")]
    tracing::trace!(depth, key = %key, "trie node created");
}

/// A route that covers a requested path.
#[derive(Debug)]
pub struct Candidate<'a, H> {
    route: &'a Route<H>,
    depth: usize,
}

impl<H> Clone for Candidate<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Candidate<'_, H> {}

impl<'a, H> Candidate<'a, H> {
    /// The bound handle.
    pub fn handle(&self) -> &'a H {
        &self.route.handle
    }

    /// The stored pattern.
    pub fn pattern(&self) -> &'a Pattern {
        &self.route.pattern
    }

    /// Trie depth of the matched position.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Bind parameters against an already normalized `path`.
    pub fn params(&self, path: &str) -> Params {
        self.route.pattern.extract(path)
    }
}

/// Maps normalized paths to handles.
///
/// Registration takes `&mut self` and lookups take `&self`, so a built
/// router can be shared (e.g. behind an `Arc`) once startup is done.
#[derive(Debug)]
pub struct Router<H> {
    config: RouterConfig,
    statics: HashMap<String, Node<H>>,
    root: Node<H>,
    len: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// Create an empty router with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Create an empty router.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            statics: HashMap::new(),
            root: Node::new(0, SegmentKey::Literal(String::new())),
            len: 0,
        }
    }

    /// The normalizer shared by patterns and paths.
    pub fn normalizer(&self) -> &Normalizer {
        &self.config.normalizer
    }

    /// Number of registered patterns.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind `handle` to `pattern`.
    ///
    /// On [`RouteError::DuplicateRoute`] the existing handle is kept. Trie
    /// nodes created on the way to a duplicate terminal stay in place.
    pub fn register(&mut self, pattern: &str, handle: H) -> Result<(), RouteError> {
        let normalized = self.config.normalizer.clean(pattern);
        let result = self.insert(normalized.clone(), handle);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(()) => tracing::debug!(pattern = %normalized, "route registered"),
            Err(e) => tracing::warn!(pattern = %normalized, error = %e, "route rejected"),
        }

        result
    }

    /// Report the error [`Router::register`] would return for `pattern`,
    /// without registering anything.
    pub fn check(&self, pattern: &str) -> Result<(), RouteError> {
        let normalized = self.config.normalizer.clean(pattern);
        let parsed = self.parse_bounded(&normalized)?;
        if self.contains_parsed(&normalized, &parsed) {
            return Err(RouteError::DuplicateRoute(normalized));
        }
        Ok(())
    }

    fn parse_bounded(&self, normalized: &str) -> Result<Pattern, RouteError> {
        let pattern = Pattern::parse(normalized)?;
        if pattern.len() > self.config.max_depth {
            return Err(RouteError::TooManySegments {
                pattern: normalized.to_string(),
                limit: self.config.max_depth,
            });
        }
        Ok(pattern)
    }

    fn insert(&mut self, normalized: String, handle: H) -> Result<(), RouteError> {
        let pattern = self.parse_bounded(&normalized)?;

        if pattern.is_static() {
            let key = pattern
                .segments()
                .last()
                .map(Segment::key)
                .unwrap_or(SegmentKey::Literal(String::new()));
            let mut node = Node::new(pattern.len(), key);
            match self.statics.entry(normalized) {
                Entry::Occupied(entry) => {
                    return Err(RouteError::DuplicateRoute(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    node.route = Some(Route { pattern, handle });
                    entry.insert(node);
                }
            }
        } else {
            let mut node = &mut self.root;
            for segment in pattern.segments() {
                node = node.child_or_insert(segment);
            }
            if node.route.is_some() {
                return Err(RouteError::DuplicateRoute(normalized));
            }
            node.route = Some(Route { pattern, handle });
        }

        self.len += 1;
        Ok(())
    }

    /// Returns true if a pattern equivalent to `pattern` is registered.
    pub fn contains(&self, pattern: &str) -> bool {
        let normalized = self.config.normalizer.clean(pattern);
        match Pattern::parse(&normalized) {
            Ok(parsed) => self.contains_parsed(&normalized, &parsed),
            Err(_) => false,
        }
    }

    fn contains_parsed(&self, normalized: &str, pattern: &Pattern) -> bool {
        if pattern.is_static() {
            return self.statics.contains_key(normalized);
        }

        let mut node = &self.root;
        for segment in pattern.segments() {
            match node.child(segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.route.is_some()
    }

    /// All registered routes: static ones sorted by path, then the trie in
    /// depth-first order.
    pub fn routes(&self) -> Vec<&Route<H>> {
        let mut out = Vec::with_capacity(self.len);

        let mut statics: Vec<_> = self.statics.iter().collect();
        statics.sort_by(|a, b| a.0.cmp(b.0));
        out.extend(statics.into_iter().filter_map(|(_, node)| node.route.as_ref()));

        self.root.collect(&mut out);
        out
    }

    /// Every registered pattern, in [`Router::routes`] order.
    pub fn patterns(&self) -> Vec<&Pattern> {
        self.routes().into_iter().map(Route::pattern).collect()
    }

    /// Find every route covering `path`, most specific first.
    ///
    /// An empty result means nothing covers the path.
    pub fn find(&self, path: &str) -> Vec<Candidate<'_, H>> {
        let normalized = self.config.normalizer.clean(path);

        if let Some(node) = self.statics.get(&normalized) {
            return node
                .route
                .iter()
                .map(|route| Candidate {
                    route,
                    depth: node.depth,
                })
                .collect();
        }

        let parts: Vec<&str> = segments(&normalized).collect();
        let found = self.search(&parts);

        #[cfg(feature = "tracing")]
        tracing::trace!(path = %normalized, candidates = found.len(), "route lookup");

        found
    }

    fn search<'a>(&'a self, parts: &[&str]) -> Vec<Candidate<'a, H>> {
        let target = parts.len();
        let mut found = Vec::new();
        let mut fallbacks: Vec<&Node<H>> = Vec::new();
        let mut current = Some(&self.root);

        while let Some(node) = current.take().or_else(|| fallbacks.pop()) {
            if node.key == SegmentKey::Wildcard || node.depth == target {
                if let Some(route) = &node.route {
                    found.push(Candidate {
                        route,
                        depth: node.depth,
                    });
                }
                continue;
            }

            // Pushed wildcard first so the parameter pops first.
            if let Some(wildcard) = node.wildcard.as_deref() {
                fallbacks.push(wildcard);
            }
            if let Some(param) = node.param.as_deref() {
                fallbacks.push(param);
            }
            current = node.literals.get(parts[node.depth]);
        }

        found
    }

    /// Normalize `path` and bind the parameters of `candidate` against it.
    pub fn params(&self, candidate: &Candidate<'_, H>, path: &str) -> Params {
        candidate.params(&self.config.normalizer.clean(path))
    }
}
