//! # exprcomplete - Template Expression Authoring
//!
//! Live, cursor-aware autocomplete for `${{ ... }}` template expressions
//! embedded in free-text fields. Expressions reference a runtime variable
//! tree (`json`, `$vars`, per-node outputs); this crate locates the block
//! the cursor is in, offers matching variable paths, and computes the exact
//! splice that applies a chosen path without disturbing surrounding text.
//!
//! ## Core Features
//!
//! - **Context Location**: open-block detection and anchor resolution (`json`, `$`, `.`, `[`)
//! - **Schema Flattening**: nested JSON trees to ordered, addressable paths
//! - **Ranking**: order-preserving fragment filtering, capped to a page
//! - **Edit Planning**: delete range, insert text and caret, derived from live state
//! - **Dialects**: `json.`-rooted and `$json.`-rooted reference styles
//! - **Editor Surface**: key handling, two-phase caret, and a focus-routed command channel
//!
//! ## Quick Start
//!
//! ```rust
//! use exprcomplete::completion::{flatten, plan_edit, suggest};
//! use exprcomplete::Dialect;
//! use serde_json::json;
//!
//! let schema = json!({ "json": { "user": { "name": "A" } } });
//! let nodes = flatten(&schema, "");
//!
//! let text = "Hello ${{ json.";
//! let (_, suggestions) = suggest(text, text.len(), &nodes, Dialect::Json, 10).unwrap();
//! assert_eq!(suggestions[0].path, "json.user");
//!
//! let plan = plan_edit(text, text.len(), &suggestions[0], Dialect::Json);
//! assert_eq!(plan.apply(text), "Hello ${{ json.user");
//! ```
//!
//! ### Editor Fields
//!
//! ```rust
//! use exprcomplete::editor::{ExpressionField, FieldRegistry};
//! use exprcomplete::EngineConfig;
//! use serde_json::json;
//!
//! let schema = json!({ "json": { "id": 1 } });
//! let mut registry = FieldRegistry::new();
//! registry.register("body", ExpressionField::new("body", "", schema, EngineConfig::default()));
//!
//! // A variable browser inserts into whichever field has focus
//! registry.focus("body").unwrap();
//! registry.insert_into_focused("${{ json.id }}").unwrap();
//! assert_eq!(registry.get("body").unwrap().text(), "${{ json.id }}");
//! ```

pub mod completion;
pub mod config;
pub mod dialect;
pub mod editor;
pub mod error;
pub mod scope;

pub use config::EngineConfig;
pub use dialect::Dialect;
pub use error::{EngineError, EngineResult};
pub use scope::VariableScope;
