//! Edit planning
//!
//! Computes the splice that applies a chosen suggestion: which range to
//! delete, what to insert, and where the caret lands afterwards.

use serde::Serialize;
use tracing::debug;

use super::context::{locate_block, OPEN_DELIMITER};
use super::matching::Suggestion;
use super::schema::last_segment;
use crate::dialect::{Dialect, ROOT_KEYWORD};

/// A single atomic text replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPlan {
    /// Start of the replaced range
    pub delete_from: usize,
    /// End of the replaced range (exclusive)
    pub delete_to: usize,
    /// Text inserted at `delete_from`
    pub insert_text: String,
    /// Caret offset once the plan is applied
    pub caret_after: usize,
}

impl EditPlan {
    /// Pure insertion at `at`
    pub fn insertion(at: usize, insert_text: String) -> Self {
        Self::replacement(at, at, insert_text)
    }

    /// Replace `from..to` with `insert_text`
    pub fn replacement(from: usize, to: usize, insert_text: String) -> Self {
        Self {
            delete_from: from,
            delete_to: to,
            caret_after: from + insert_text.len(),
            insert_text,
        }
    }

    /// Apply the plan to `text`, returning the new text
    pub fn apply(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() + self.insert_text.len());
        result.push_str(&text[..self.delete_from]);
        result.push_str(&self.insert_text);
        result.push_str(&text[self.delete_to..]);
        result
    }
}

/// Wrap a path as a complete expression block
pub fn wrap_expression(path: &str) -> String {
    format!("{} {} }}}}", OPEN_DELIMITER, path)
}

/// Plan the acceptance of `suggestion` at `cursor`
///
/// The block and its anchor are derived here, from the live text and
/// cursor, so a plan never drifts from what the user currently sees.
///
/// Outside a block the path is wrapped in a fresh `${{ ... }}`. Inside one
/// the fragment typed since the anchor is replaced:
/// - after `json` or `json.` the root prefix is dropped (`json.user`
///   inserts `user`, even straight after a bare `json`)
/// - after any other `.` only the leaf segment is inserted
/// - otherwise the path is inserted verbatim
///
/// # Examples
///
/// ```
/// use exprcomplete::completion::{plan_edit, Suggestion, ValueKind};
/// use exprcomplete::Dialect;
///
/// let suggestion = Suggestion::new("json.id", ValueKind::Number);
/// let plan = plan_edit("", 0, &suggestion, Dialect::Json);
/// assert_eq!(plan.apply(""), "${{ json.id }}");
/// assert_eq!(plan.caret_after, 14);
/// ```
pub fn plan_edit(text: &str, cursor: usize, suggestion: &Suggestion, dialect: Dialect) -> EditPlan {
    let cursor = clamp_cursor(text, cursor);

    let block = match locate_block(text, cursor) {
        Some(block) => block,
        None => {
            debug!(cursor, path = %suggestion.path, "wrapping suggestion in a new block");
            return EditPlan::insertion(cursor, wrap_expression(&suggestion.path));
        }
    };

    let insert_at = block.fragment_start;
    let before = &text[..insert_at];
    let after_root =
        before.ends_with(ROOT_KEYWORD) || before.ends_with(&format!("{}.", ROOT_KEYWORD));

    let insert_text = if after_root {
        dialect.strip_root(&suggestion.path).to_string()
    } else if before.ends_with('.') {
        last_segment(&suggestion.path).to_string()
    } else {
        suggestion.path.clone()
    };

    debug!(
        anchor = ?block.anchor,
        insert_at,
        cursor,
        insert = %insert_text,
        "planned in-block edit"
    );
    EditPlan::replacement(insert_at, cursor, insert_text)
}

/// Plan a verbatim splice of `literal` at `offset`
///
/// Used for drag-and-drop payloads and external "insert variable"
/// commands; anchors and aliases play no part.
pub fn plan_literal(text: &str, offset: usize, literal: &str) -> EditPlan {
    EditPlan::insertion(clamp_cursor(text, offset), literal.to_string())
}

/// Clamp an offset into `text` and back onto a char boundary
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::schema::ValueKind;

    fn suggestion(path: &str) -> Suggestion {
        Suggestion::new(path, ValueKind::String)
    }

    fn accept(text: &str, path: &str) -> (String, usize) {
        let plan = plan_edit(text, text.len(), &suggestion(path), Dialect::Json);
        (plan.apply(text), plan.caret_after)
    }

    #[test]
    fn test_wrap_outside_block() {
        let plan = plan_edit("", 0, &suggestion("json.id"), Dialect::Json);
        assert_eq!(plan.delete_from, 0);
        assert_eq!(plan.delete_to, 0);
        assert_eq!(plan.insert_text, "${{ json.id }}");
        assert_eq!(plan.caret_after, 14);
    }

    #[test]
    fn test_wrap_mid_text() {
        let text = "Hi  there";
        let plan = plan_edit(text, 3, &suggestion("json.name"), Dialect::Json);
        assert_eq!(plan.apply(text), "Hi ${{ json.name }} there");
        assert_eq!(plan.caret_after, 3 + "${{ json.name }}".len());
    }

    #[test]
    fn test_wrap_after_closed_block() {
        let (text, caret) = accept("${{ json.a }} ", "json.b");
        assert_eq!(text, "${{ json.a }} ${{ json.b }}");
        assert_eq!(caret, text.len());
    }

    #[test]
    fn test_after_root_dot_strips_prefix() {
        let (text, caret) = accept("Hello ${{ json.", "json.user");
        assert_eq!(text, "Hello ${{ json.user");
        assert_eq!(caret, text.len());
    }

    #[test]
    fn test_after_root_dot_replaces_fragment() {
        let (text, _) = accept("${{ json.us", "json.user");
        assert_eq!(text, "${{ json.user");
    }

    #[test]
    fn test_after_root_dot_keeps_relative_path() {
        let (text, _) = accept("${{ json.na", "json.user.name");
        assert_eq!(text, "${{ json.user.name");
    }

    #[test]
    fn test_after_bare_keyword_strips_root() {
        let plan = plan_edit("${{ json", 8, &suggestion("json.user"), Dialect::Json);
        assert_eq!(plan.delete_from, 8);
        assert_eq!(plan.insert_text, "user");
        assert_eq!(plan.apply("${{ json"), "${{ jsonuser");
        assert_eq!(plan.caret_after, 12);
    }

    #[test]
    fn test_trailing_dot_inserts_leaf() {
        let (text, caret) = accept("${{ json.user.", "json.user.name");
        assert_eq!(text, "${{ json.user.name");
        assert_eq!(caret, text.len());
    }

    #[test]
    fn test_dot_replaces_typed_fragment_with_leaf() {
        let (text, _) = accept("${{ json.user.na", "json.user.name");
        assert_eq!(text, "${{ json.user.name");
    }

    #[test]
    fn test_dollar_anchor_verbatim() {
        let (text, _) = accept("${{ $va", "$vars.workflow.id");
        assert_eq!(text, "${{ $vars.workflow.id");
    }

    #[test]
    fn test_no_anchor_verbatim() {
        let plan = plan_edit("${{ ", 4, &suggestion("json.a"), Dialect::Json);
        assert_eq!(plan.delete_from, 3);
        assert_eq!(plan.apply("${{ "), "${{json.a");
    }

    #[test]
    fn test_bracket_verbatim() {
        let (text, _) = accept("${{ json.items[", "json.items");
        assert_eq!(text, "${{ json.items[json.items");
    }

    #[test]
    fn test_keeps_text_after_cursor() {
        let text = "${{ json.us }} tail";
        let plan = plan_edit(text, 11, &suggestion("json.user"), Dialect::Json);
        assert_eq!(plan.apply(text), "${{ json.user }} tail");
        assert_eq!(plan.caret_after, 13);
    }

    #[test]
    fn test_dollar_dialect_strips_dollar_root() {
        let text = "${{ $json.";
        let plan = plan_edit(text, text.len(), &suggestion("$json.node1"), Dialect::Dollar);
        assert_eq!(plan.apply(text), "${{ $json.node1");
    }

    #[test]
    fn test_recomputed_from_live_text() {
        // The same suggestion lands differently once the user has typed more
        let s = suggestion("json.user.name");
        let first = plan_edit("${{ json.user", 13, &s, Dialect::Json);
        let second = plan_edit("${{ json.user.", 14, &s, Dialect::Json);
        assert_eq!(first.delete_from, 9);
        assert_eq!(first.insert_text, "user.name");
        assert_eq!(second.insert_text, "name");
        assert_eq!(second.delete_from, 14);
    }

    #[test]
    fn test_literal_splice() {
        let text = "ab";
        let plan = plan_literal(text, 1, "{{x}}");
        assert_eq!(plan.apply(text), "a{{x}}b");
        assert_eq!(plan.caret_after, 6);
    }

    #[test]
    fn test_literal_ignores_anchors() {
        let text = "${{ json.";
        let plan = plan_literal(text, text.len(), "json.user");
        assert_eq!(plan.apply(text), "${{ json.json.user");
    }

    #[test]
    fn test_literal_clamps_offset() {
        let plan = plan_literal("abc", 99, "!");
        assert_eq!(plan.apply("abc"), "abc!");
    }

    #[test]
    fn test_clamp_to_char_boundary() {
        let text = "é";
        assert_eq!(clamp_cursor(text, 1), 0);
        assert_eq!(clamp_cursor(text, 2), 2);
    }
}
