//! Route patterns.
//!
//! A pattern is a normalized path split on `/`. Segments starting with `:`
//! bind one path segment, a segment starting with `*` binds everything that
//! is left and must come last.

use crate::{error::RouteError, normalize::segments, params::Params};
use std::fmt;

/// Prefix of a single-segment parameter.
pub const PARAM_MARKER: char = ':';
/// Prefix of a trailing wildcard, and the key a nameless wildcard binds under.
pub const WILDCARD_MARKER: char = '*';

/// One `/`-delimited token of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matched verbatim (after case folding).
    Literal(String),
    /// Binds exactly one path segment to a name.
    Param(String),
    /// Binds all remaining path segments to a name.
    Wildcard(String),
}

impl Segment {
    /// Classify a raw segment.
    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(PARAM_MARKER) {
            Segment::Param(name.to_string())
        } else if let Some(name) = raw.strip_prefix(WILDCARD_MARKER) {
            Segment::Wildcard(name.to_string())
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    /// The trie key this segment lives under.
    pub fn key(&self) -> SegmentKey {
        match self {
            Segment::Literal(value) => SegmentKey::Literal(value.clone()),
            Segment::Param(_) => SegmentKey::Param,
            Segment::Wildcard(_) => SegmentKey::Wildcard,
        }
    }

    /// Returns true for parameters and wildcards.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Literal(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(value) => f.write_str(value),
            Segment::Param(name) => write!(f, "{}{}", PARAM_MARKER, name),
            Segment::Wildcard(name) => write!(f, "{}{}", WILDCARD_MARKER, name),
        }
    }
}

/// Key of a child in the trie.
///
/// Parameter and wildcard names are dropped: `/a/:id` and `/a/:name` share
/// a node, so registering both is a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentKey {
    /// A literal segment value.
    Literal(String),
    /// Any parameter.
    Param,
    /// Any wildcard.
    Wildcard,
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKey::Literal(value) => f.write_str(value),
            SegmentKey::Param => write!(f, "{}", PARAM_MARKER),
            SegmentKey::Wildcard => write!(f, "{}", WILDCARD_MARKER),
        }
    }
}

/// A parsed route template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parse an already normalized path.
    ///
    /// Fails with [`RouteError::WildcardNotAtEnd`] if a wildcard is followed
    /// by anything.
    pub fn parse(normalized: &str) -> Result<Self, RouteError> {
        let segments: Vec<Segment> = segments(normalized).map(Segment::parse).collect();

        let last = segments.len().saturating_sub(1);
        if segments
            .iter()
            .enumerate()
            .any(|(i, s)| matches!(s, Segment::Wildcard(_)) && i != last)
        {
            return Err(RouteError::WildcardNotAtEnd(normalized.to_string()));
        }

        Ok(Self {
            source: normalized.to_string(),
            segments,
        })
    }

    /// The normalized text this pattern was parsed from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments; the root pattern has none.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root pattern.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if no segment is a parameter or wildcard.
    pub fn is_static(&self) -> bool {
        !self.segments.iter().any(Segment::is_dynamic)
    }

    /// Returns true if the pattern ends in a wildcard.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }

    /// Bind the parameters of this pattern against a normalized path.
    ///
    /// Alignment is positional, so `path` must have been normalized the same
    /// way the pattern was. Path segments past the end of the pattern only
    /// matter when a wildcard absorbs them.
    pub fn extract(&self, path: &str) -> Params {
        let parts: Vec<&str> = segments(path).collect();
        let mut params = Params::new();

        for (i, segment) in self.segments.iter().enumerate().take(parts.len()) {
            match segment {
                Segment::Literal(_) => {}
                Segment::Param(name) => params.insert(name.clone(), parts[i].to_string()),
                Segment::Wildcard(name) => {
                    let key = if name.is_empty() {
                        WILDCARD_MARKER.to_string()
                    } else {
                        name.clone()
                    };
                    params.insert(key, parts[i..].join("/"));
                }
            }
        }

        params
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            f.write_str("/")
        } else {
            f.write_str(&self.source)
        }
    }
}
