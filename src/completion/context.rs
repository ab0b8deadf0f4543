//! Context detection for expression completion
//!
//! Determines whether the cursor sits inside an open `${{` block and which
//! anchor governs the fragment currently being typed.

use serde::Serialize;

use crate::dialect::ROOT_KEYWORD;

/// Block opener
pub const OPEN_DELIMITER: &str = "${{";
/// Block closer
pub const CLOSE_DELIMITER: &str = "}}";

/// The marker nearest before the cursor that decides how the fragment is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnchorKind {
    /// After the `json` root keyword
    RootKeyword,
    /// At a `$` (fragment includes the `$`)
    Dollar,
    /// After a `.`
    Dot,
    /// After a `[`
    Bracket,
    /// No marker yet, the whole block body is the fragment
    None,
}

/// The open expression block containing the cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionBlock {
    /// Offset of the `${{` opener
    pub open_at: usize,
    /// Offset of the next `}}` after the cursor, if any
    pub close_at: Option<usize>,
    /// Governing anchor
    pub anchor: AnchorKind,
    /// Text typed since the anchor (`text[fragment_start..cursor]`)
    pub fragment: String,
    /// Offset where the fragment starts; replacement begins here
    pub fragment_start: usize,
}

/// Find the open expression block around `cursor`
///
/// Returns `None` when the cursor is outside every block, past the end of
/// the text, or not on a char boundary.
///
/// # Examples
///
/// ```
/// use exprcomplete::completion::{locate_block, AnchorKind};
///
/// let block = locate_block("Hello ${{ json.us", 17).unwrap();
/// assert_eq!(block.anchor, AnchorKind::Dot);
/// assert_eq!(block.fragment, "us");
///
/// assert!(locate_block("${{ json.a }} after", 19).is_none());
/// ```
pub fn locate_block(text: &str, cursor: usize) -> Option<ExpressionBlock> {
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }

    let before = &text[..cursor];
    let open_at = before.rfind(OPEN_DELIMITER)?;
    if let Some(close) = before.rfind(CLOSE_DELIMITER) {
        if close > open_at {
            return None;
        }
    }

    let body_start = open_at + OPEN_DELIMITER.len();
    let inner = &text[body_start..cursor];
    let (anchor, offset) = resolve_anchor(inner);

    let close_at = text[cursor..].find(CLOSE_DELIMITER).map(|i| cursor + i);

    Some(ExpressionBlock {
        open_at,
        close_at,
        anchor,
        fragment: inner[offset..].to_string(),
        fragment_start: body_start + offset,
    })
}

/// Resolve the governing anchor inside a block body
///
/// Returns the anchor and the offset (within `inner`) where the fragment
/// starts. Precedence: `json` keyword (when later than any `.`), then `$`
/// (when later than both `.` and `[`), then `.` (when later than `[`),
/// then `[`, else no anchor.
///
/// The keyword match is a plain substring search, so `myjson` counts.
pub fn resolve_anchor(inner: &str) -> (AnchorKind, usize) {
    let keyword = inner.rfind(ROOT_KEYWORD);
    let dot = inner.rfind('.');
    let bracket = inner.rfind('[');
    let dollar = inner.rfind('$');

    // `None` orders below every `Some`, matching a -1 "not found" index.
    if let Some(k) = keyword {
        if keyword > dot {
            return (AnchorKind::RootKeyword, k + ROOT_KEYWORD.len());
        }
    }
    if let Some(d) = dollar {
        if dollar > dot && dollar > bracket {
            return (AnchorKind::Dollar, d);
        }
    }
    if let Some(d) = dot {
        if dot > bracket {
            return (AnchorKind::Dot, d + 1);
        }
    }
    if let Some(b) = bracket {
        return (AnchorKind::Bracket, b + 1);
    }
    (AnchorKind::None, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str) -> Option<ExpressionBlock> {
        locate_block(text, text.len())
    }

    #[test]
    fn test_no_opener() {
        assert!(at_end("plain text").is_none());
        assert!(at_end("").is_none());
    }

    #[test]
    fn test_closed_block() {
        assert!(at_end("${{ json.a }}").is_none());
        assert!(at_end("${{ json.a }} and more").is_none());
    }

    #[test]
    fn test_second_block_open() {
        let block = at_end("${{ json.a }} then ${{ js").unwrap();
        assert_eq!(block.open_at, 19);
        assert_eq!(block.anchor, AnchorKind::None);
        assert_eq!(block.fragment, " js");
        assert_eq!(block.fragment_start, 22);
    }

    #[test]
    fn test_unterminated_extends_to_end() {
        let block = at_end("a ${{").unwrap();
        assert_eq!(block.open_at, 2);
        assert_eq!(block.close_at, None);
        assert_eq!(block.fragment, "");
        assert_eq!(block.fragment_start, 5);
    }

    #[test]
    fn test_cursor_inside_closed_block() {
        // Cursor before the closer still counts as inside
        let text = "${{ json.us }}";
        let block = locate_block(text, 11).unwrap();
        assert_eq!(block.anchor, AnchorKind::Dot);
        assert_eq!(block.fragment, "us");
        assert_eq!(block.close_at, Some(12));
    }

    #[test]
    fn test_root_keyword_anchor() {
        let block = at_end("${{ json").unwrap();
        assert_eq!(block.anchor, AnchorKind::RootKeyword);
        assert_eq!(block.fragment, "");
        assert_eq!(block.fragment_start, 8);
    }

    #[test]
    fn test_root_keyword_without_boundary() {
        let block = at_end("${{ myjsonx").unwrap();
        assert_eq!(block.anchor, AnchorKind::RootKeyword);
        assert_eq!(block.fragment, "x");
    }

    #[test]
    fn test_dot_anchor_after_keyword() {
        let block = at_end("Hello ${{ json.").unwrap();
        assert_eq!(block.anchor, AnchorKind::Dot);
        assert_eq!(block.fragment, "");
        assert_eq!(block.fragment_start, 15);
    }

    #[test]
    fn test_dollar_anchor() {
        let block = at_end("${{ $va").unwrap();
        assert_eq!(block.anchor, AnchorKind::Dollar);
        assert_eq!(block.fragment, "$va");
        assert_eq!(block.fragment_start, 4);
    }

    #[test]
    fn test_dollar_json_is_keyword() {
        let block = at_end("${{ $json").unwrap();
        assert_eq!(block.anchor, AnchorKind::RootKeyword);
    }

    #[test]
    fn test_dot_after_dollar() {
        let block = at_end("${{ $vars.wo").unwrap();
        assert_eq!(block.anchor, AnchorKind::Dot);
        assert_eq!(block.fragment, "wo");
    }

    #[test]
    fn test_bracket_anchor() {
        let block = at_end("${{ json.items['ke").unwrap();
        assert_eq!(block.anchor, AnchorKind::Bracket);
        assert_eq!(block.fragment, "'ke");
    }

    #[test]
    fn test_no_anchor() {
        let block = at_end("${{ us").unwrap();
        assert_eq!(block.anchor, AnchorKind::None);
        assert_eq!(block.fragment, " us");
        assert_eq!(block.fragment_start, 3);
    }

    #[test]
    fn test_cursor_out_of_range() {
        assert!(locate_block("${{", 10).is_none());
    }

    #[test]
    fn test_cursor_not_on_char_boundary() {
        let text = "${{ é";
        assert!(locate_block(text, text.len() - 1).is_none());
        assert!(locate_block(text, text.len()).is_some());
    }

    #[test]
    fn test_cursor_inside_opener() {
        assert!(locate_block("${{", 2).is_none());
    }

    #[test]
    fn test_fragment_matches_slice() {
        let text = "x ${{ json.user.na";
        let block = at_end(text).unwrap();
        assert_eq!(&text[block.fragment_start..], block.fragment);
    }
}
