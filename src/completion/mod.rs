//! Expression completion engine
//!
//! The pipeline run on every keystroke:
//! - locate the open `${{` block around the cursor and its anchor
//! - flatten the variable tree (cached by callers between keystrokes)
//! - filter the flattened paths against the typed fragment
//! - on acceptance, plan the splice from the live text and cursor

mod blocks;
mod context;
mod edit;
mod matching;
mod schema;
mod state;

pub use blocks::{find_blocks, referenced_roots, BlockSpan};
pub use context::{
    locate_block, resolve_anchor, AnchorKind, ExpressionBlock, CLOSE_DELIMITER, OPEN_DELIMITER,
};
pub use edit::{clamp_cursor, plan_edit, plan_literal, wrap_expression, EditPlan};
pub use matching::{filter_suggestions, normalize_fragment, Candidate, Suggestion};
pub use schema::{flatten, last_segment, ValueKind, VariableNode};
pub use state::{CompletionPhase, CompletionState};

use crate::dialect::Dialect;

/// Run locator and ranker for one keystroke
///
/// Returns the block and its suggestions, or `None` outside any block.
pub fn suggest(
    text: &str,
    cursor: usize,
    nodes: &[VariableNode],
    dialect: Dialect,
    limit: usize,
) -> Option<(ExpressionBlock, Vec<Suggestion>)> {
    let block = locate_block(text, cursor)?;
    let suggestions = filter_suggestions(nodes, &block.fragment, block.anchor, dialect, limit);
    Some((block, suggestions))
}
