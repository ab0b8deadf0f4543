//! Expression block scanning
//!
//! Finds every `${{ ... }}` span in a text, for highlighting and reporting.
//! No syntax checking happens here; a span is whatever the delimiters enclose.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;

use super::context::OPEN_DELIMITER;

lazy_static! {
    /// A terminated block whose body contains no `}`
    static ref BLOCK_PATTERN: Regex = Regex::new(r"\$\{\{([^}]+)\}\}").unwrap();
}

/// Location of one expression block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSpan {
    /// Offset of `${{`
    pub start: usize,
    /// End of the block (after `}}`, or end of text when unterminated)
    pub end: usize,
    /// Start of the body
    pub inner_start: usize,
    /// End of the body
    pub inner_end: usize,
    /// Whether the block has its closing `}}`
    pub terminated: bool,
}

impl BlockSpan {
    /// The whole block as a byte range
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The trimmed body text
    pub fn expression<'a>(&self, text: &'a str) -> &'a str {
        text[self.inner_start..self.inner_end].trim()
    }
}

/// Find every expression block in document order
///
/// A trailing `${{` without a closer yields one unterminated span running
/// to the end of the text.
pub fn find_blocks(text: &str) -> Vec<BlockSpan> {
    let mut blocks: Vec<BlockSpan> = BLOCK_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(BlockSpan {
                start: whole.start(),
                end: whole.end(),
                inner_start: inner.start(),
                inner_end: inner.end(),
                terminated: true,
            })
        })
        .collect();

    let tail_start = blocks.last().map(|b| b.end).unwrap_or(0);
    if let Some(pos) = text[tail_start..].find(OPEN_DELIMITER) {
        let start = tail_start + pos;
        blocks.push(BlockSpan {
            start,
            end: text.len(),
            inner_start: start + OPEN_DELIMITER.len(),
            inner_end: text.len(),
            terminated: false,
        });
    }

    blocks
}

/// Leading root token of every terminated block, deduplicated in order
///
/// `${{ json.user }} ${{ $vars.id }}` yields `["json", "$vars"]`.
pub fn referenced_roots(text: &str) -> Vec<String> {
    let mut roots: Vec<String> = Vec::new();
    for block in find_blocks(text).iter().filter(|b| b.terminated) {
        let root: String = block
            .expression(text)
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        if !root.is_empty() && !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_blocks() {
        assert!(find_blocks("plain").is_empty());
    }

    #[test]
    fn test_single_block() {
        let text = "Hi ${{ json.name }}!";
        let blocks = find_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].range(), 3..19);
        assert!(blocks[0].terminated);
        assert_eq!(blocks[0].expression(text), "json.name");
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let text = "${{ json.a }}-${{ $vars.b }}";
        let blocks = find_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].start, 14);
        assert_eq!(blocks[1].expression(text), "$vars.b");
    }

    #[test]
    fn test_unterminated_tail() {
        let text = "${{ json.a }} and ${{ json.";
        let blocks = find_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert!(!blocks[1].terminated);
        assert_eq!(blocks[1].end, text.len());
        assert_eq!(blocks[1].expression(text), "json.");
    }

    #[test]
    fn test_stray_closer_ignored() {
        let blocks = find_blocks("a }} b");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_empty_body_not_terminated_block() {
        // `[^}]+` needs a body, so `${{}}` reads as an opener left open
        let blocks = find_blocks("${{}}");
        assert_eq!(blocks.len(), 1);
        assert!(!blocks[0].terminated);
    }

    #[test]
    fn test_referenced_roots() {
        let text = "${{ json.user }} ${{ $vars.id }} ${{ json.x }} ${{ json.";
        assert_eq!(referenced_roots(text), ["json", "$vars"]);
    }
}
