//! Path dialects
//!
//! Two reference styles are in use by call sites: the `json.`-rooted alias
//! style (`${{ json.user.name }}`) and the `$`-prefixed style
//! (`${{ $json.node.field }}`). Both stay selectable; the dialect decides
//! which root the engine treats as "the" variable root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The literal keyword the context locator anchors on, in every dialect
pub const ROOT_KEYWORD: &str = "json";

/// Path dialect strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Paths rooted at `json` (`json.user.name`)
    #[default]
    Json,
    /// Paths rooted at `$json` (`$json.node.field`)
    Dollar,
}

impl Dialect {
    /// Root path segment for this dialect
    pub fn root(&self) -> &'static str {
        match self {
            Dialect::Json => "json",
            Dialect::Dollar => "$json",
        }
    }

    /// Root path followed by the separator, e.g. `json.`
    pub fn root_prefix(&self) -> String {
        format!("{}.", self.root())
    }

    /// Whether `fragment` names the bare root (`json` or `$json`)
    pub fn is_bare_root(&self, fragment: &str) -> bool {
        let fragment = fragment.trim();
        fragment == ROOT_KEYWORD || fragment == "$json" || fragment == self.root()
    }

    /// Whether `path` is a direct child of the root (`json.x`, not `json.x.y`)
    pub fn is_root_child(&self, path: &str) -> bool {
        match path.strip_prefix(&self.root_prefix()) {
            Some(rest) => !rest.is_empty() && !rest.contains('.'),
            None => false,
        }
    }

    /// Strip the root prefix from `path`, yielding a reference relative to the root
    pub fn strip_root<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(&self.root_prefix()).unwrap_or(path)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Json => write!(f, "json"),
            Dialect::Dollar => write!(f, "dollar"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Dialect::Json),
            "dollar" | "$json" | "$" => Ok(Dialect::Dollar),
            other => Err(format!("unknown dialect '{}' (expected json or dollar)", other)),
        }
    }
}
