//! Suggestion matching and filtering
//!
//! Filters flattened variable paths against the typed fragment. Results
//! keep traversal order; there is no relevance re-sort.

use serde::Serialize;
use tracing::trace;

use super::context::AnchorKind;
use super::schema::{last_segment, ValueKind, VariableNode};
use crate::dialect::Dialect;

/// A variable path offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Full path, e.g. `json.user.name`
    pub path: String,
    /// Kind of the value at the path
    pub kind: ValueKind,
}

impl Suggestion {
    /// Create a new suggestion
    pub fn new(path: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Get the display label
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl From<&VariableNode> for Suggestion {
    fn from(node: &VariableNode) -> Self {
        Suggestion::new(node.path.clone(), node.kind)
    }
}

/// Anything the ranker can filter: flattened nodes or earlier suggestions
pub trait Candidate {
    fn path(&self) -> &str;
    fn kind(&self) -> ValueKind;
}

impl Candidate for VariableNode {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl Candidate for Suggestion {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Strip everything outside `[a-zA-Z0-9_$]` and lower-case
pub fn normalize_fragment(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Whether `path` matches an already-normalized fragment
fn path_matches(path: &str, needle: &str) -> bool {
    let leaf = last_segment(path).to_lowercase();
    leaf.contains(needle) || leaf.starts_with(needle) || path.to_lowercase().contains(needle)
}

/// Filter candidates against the fragment typed since the anchor
///
/// An empty fragment, or the bare root keyword, lists the direct children
/// of the dialect root. Anything else is matched against each path's last
/// segment and the full path, case-insensitively. At most `limit` results.
pub fn filter_suggestions<C: Candidate>(
    candidates: &[C],
    fragment: &str,
    anchor: AnchorKind,
    dialect: Dialect,
    limit: usize,
) -> Vec<Suggestion> {
    let to_suggestion = |c: &C| Suggestion::new(c.path(), c.kind());

    let suggestions: Vec<Suggestion> = if fragment.trim().is_empty() || dialect.is_bare_root(fragment)
    {
        candidates
            .iter()
            .filter(|c| dialect.is_root_child(c.path()))
            .take(limit)
            .map(to_suggestion)
            .collect()
    } else {
        let needle = normalize_fragment(fragment);
        candidates
            .iter()
            .filter(|c| path_matches(c.path(), &needle))
            .take(limit)
            .map(to_suggestion)
            .collect()
    };

    trace!(
        fragment,
        ?anchor,
        count = suggestions.len(),
        "filtered suggestions"
    );
    suggestions
}
