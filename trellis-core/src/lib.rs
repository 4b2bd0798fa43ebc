//! # trellis-core
//!
//! The routing core of the Trellis handler registry: it maps hierarchical
//! paths such as `/a/:id/files/*rest` to opaque handles.
//!
//! This crate has minimal dependencies and knows nothing about what a handle
//! is. Higher layers (see `trellis-std`) build pattern strings, register
//! handles, and pick the first usable candidate at serve time.
//!
//! # Layers
//!
//! - [`Normalizer`]: joins and cleans raw fragments into one canonical path.
//! - [`Pattern`]: a normalized path split into [`Segment`]s.
//! - [`Router`]: static index plus dynamic trie; owns registration and lookup.
//! - [`Params`]: bindings recovered from a [`Candidate`] and a path.
//!
//! # Pattern syntax
//!
//! | Segment | Meaning |
//! |---------|---------|
//! | `users` | literal, compared after case folding |
//! | `:id` | binds exactly one segment under `id` |
//! | `*rest` | binds every remaining segment under `rest`; must be last |
//!
//! # Error Types
//!
//! - [`RouteError`] - Registration errors. Lookups never fail.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod normalize;
mod params;
mod pattern;
mod trie;

// Re-exports
pub use error::RouteError;
pub use normalize::{CaseFolding, Normalizer, segments};
pub use params::Params;
pub use pattern::{PARAM_MARKER, Pattern, Segment, SegmentKey, WILDCARD_MARKER};
pub use trie::{Candidate, DEFAULT_MAX_DEPTH, Route, Router, RouterConfig};
