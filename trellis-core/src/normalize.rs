//! Path normalization.
//!
//! Every pattern and every request path goes through the same [`Normalizer`]
//! before it touches the trie, so that `/A//b/./c/` and `/a/b/c` land on the
//! same nodes. Matching is purely positional afterwards.

/// How literal text is folded before comparison.
#[derive(Debug, Clone, Copy, Default)]
pub enum CaseFolding {
    /// Lowercase everything (case-insensitive routes).
    #[default]
    Lower,
    /// Keep the input as is.
    Preserve,
    /// A caller supplied fold.
    ///
    /// The function must be idempotent and must not introduce `/` or `.`
    /// segments, otherwise normalization stops being idempotent.
    Custom(fn(&str) -> String),
}

impl CaseFolding {
    /// Apply the fold to `input`.
    pub fn fold(&self, input: &str) -> String {
        match self {
            CaseFolding::Lower => input.to_lowercase(),
            CaseFolding::Preserve => input.to_string(),
            CaseFolding::Custom(f) => f(input),
        }
    }
}

/// Canonicalizes raw path fragments into one absolute path.
///
/// The canonical root normalizes to the empty string, which is the key the
/// root handler is stored under.
///
/// # Example
///
/// ```rust
/// use trellis_core::Normalizer;
///
/// let normalizer = Normalizer::new();
/// assert_eq!(normalizer.normalize(["Users", "/42//Files/"]), "/users/42/files");
/// assert_eq!(normalizer.normalize(["/a/./b/../c"]), "/a/c");
/// assert_eq!(normalizer.normalize(["/"]), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    case_folding: CaseFolding,
    /// Cleaned mount prefix as given; empty means `/`.
    raw_prefix: String,
    /// `raw_prefix` under the current case folding.
    root_prefix: String,
}

impl Normalizer {
    /// Create a normalizer that lowercases and mounts at `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the case folding policy.
    pub fn with_case_folding(mut self, case_folding: CaseFolding) -> Self {
        self.case_folding = case_folding;
        self.root_prefix = self.case_folding.fold(&self.raw_prefix);
        self
    }

    /// Mount every normalized path under `prefix`.
    ///
    /// The prefix is applied once: a path that already starts with it (on a
    /// segment boundary) is left alone. A consequence is that a path equal
    /// to the prefix's own segments aliases the root: with prefix `/api`,
    /// both `""` and `api` normalize to `/api`.
    ///
    /// The prefix is folded with whatever case folding is in effect, no
    /// matter which of the two builder methods runs first.
    pub fn with_root_prefix(mut self, prefix: &str) -> Self {
        let cleaned = clean(prefix);
        self.raw_prefix = if cleaned == "/" { String::new() } else { cleaned };
        self.root_prefix = self.case_folding.fold(&self.raw_prefix);
        self
    }

    /// The configured case folding policy.
    pub fn case_folding(&self) -> CaseFolding {
        self.case_folding
    }

    /// The configured root prefix, `""` when mounted at `/`.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Join, clean and fold `fragments` into a canonical path.
    pub fn normalize<I, S>(&self, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for fragment in fragments {
            joined.push('/');
            joined.push_str(fragment.as_ref());
        }

        let folded = self.case_folding.fold(&clean(&joined));
        let full = if self.root_prefix.is_empty() || has_prefix(&folded, &self.root_prefix) {
            folded
        } else {
            clean(&format!("{}{}", self.root_prefix, folded))
        };

        if full == "/" { String::new() } else { full }
    }

    /// Normalize a single path.
    pub fn clean(&self, path: &str) -> String {
        self.normalize([path])
    }

}

/// Split a normalized path into its segments.
///
/// The root (`""`) has no segments; `/a/b` has `["a", "b"]`.
pub fn segments(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split('/').skip(1)
}

fn has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Lexical cleaning of a path, rooted at `/`.
///
/// Repeated separators collapse, `.` disappears, `..` removes the previous
/// element and never climbs above the root.
fn clean(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(part),
        }
    }

    if stack.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len());
    for part in stack {
        out.push('/');
        out.push_str(part);
    }
    out
}
