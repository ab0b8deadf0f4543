//! Variable schema flattening
//!
//! Turns a nested variable tree into an ordered list of addressable paths.
//! Objects are walked depth-first in key order; arrays are opaque leaves.

use serde::Serialize;
use serde_json::Value;

/// Kind of value found at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl ValueKind {
    /// Classify a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
        }
    }

    /// Get the display label for this kind
    pub fn label(&self) -> &'static str {
        match self {
            ValueKind::Object => "[object]",
            ValueKind::Array => "[array]",
            ValueKind::String => "[string]",
            ValueKind::Number => "[number]",
            ValueKind::Boolean => "[boolean]",
            ValueKind::Null => "[null]",
        }
    }
}

/// One addressable node of the variable tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableNode {
    /// Dot-separated path, e.g. `json.user.name`
    pub path: String,
    /// Kind of the value at this path
    pub kind: ValueKind,
    /// The value itself
    pub value: Value,
}

impl VariableNode {
    /// Last dot-separated segment of the path
    pub fn leaf(&self) -> &str {
        last_segment(&self.path)
    }
}

/// Last dot-separated segment of `path`
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Flatten `value` into addressable nodes under `root`
///
/// Emits an object before its children (pre-order). With an empty `root`
/// the top-level object has no address of its own: it is skipped and its
/// keys become root segments, which is how a whole variable tree such as
/// `{ "json": {...}, "$vars": {...} }` is flattened.
///
/// # Examples
///
/// ```
/// use exprcomplete::completion::flatten;
/// use serde_json::json;
///
/// let nodes = flatten(&json!({ "json": { "user": { "name": "A" } } }), "");
/// let paths: Vec<&str> = nodes.iter().map(|n| n.path.as_str()).collect();
/// assert_eq!(paths, ["json", "json.user", "json.user.name"]);
/// ```
pub fn flatten(value: &Value, root: &str) -> Vec<VariableNode> {
    let mut nodes = Vec::new();
    if root.is_empty() {
        if let Value::Object(map) = value {
            for (key, child) in map {
                walk(child, key.clone(), &mut nodes);
            }
        }
    } else {
        walk(value, root.to_string(), &mut nodes);
    }
    nodes
}

fn walk(value: &Value, path: String, nodes: &mut Vec<VariableNode>) {
    match value {
        Value::Object(map) => {
            nodes.push(VariableNode {
                path: path.clone(),
                kind: ValueKind::Object,
                value: value.clone(),
            });
            for (key, child) in map {
                walk(child, format!("{}.{}", path, key), nodes);
            }
        }
        _ => nodes.push(VariableNode {
            path,
            kind: ValueKind::of(value),
            value: value.clone(),
        }),
    }
}
