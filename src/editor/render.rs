//! Terminal rendering for expression fields
//!
//! Produces ratatui spans; layout and drawing stay with the host.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::completion::{find_blocks, CompletionState, CLOSE_DELIMITER, OPEN_DELIMITER};

const DELIMITER_COLOR: Color = Color::Rgb(255, 20, 147);
const EXPRESSION_COLOR: Color = Color::Cyan;
const UNTERMINATED_COLOR: Color = Color::Yellow;
const LABEL_COLOR: Color = Color::Rgb(150, 150, 150);

/// One line per suggestion: `"path  [kind]"`, selected row highlighted
pub fn suggestion_lines(state: &CompletionState) -> Vec<Line<'static>> {
    if !state.is_visible() {
        return Vec::new();
    }

    let width = state
        .suggestions()
        .iter()
        .map(|s| s.path.chars().count())
        .max()
        .unwrap_or(0);

    state
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let selected = i == state.selected_index();
            let marker = if selected { "> " } else { "  " };
            let path_style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<width$}", suggestion.path, width = width), path_style),
                Span::raw("  "),
                Span::styled(suggestion.label(), Style::default().fg(LABEL_COLOR)),
            ])
        })
        .collect()
}

/// Syntax highlight a line of template text
///
/// # Color scheme:
/// - `${{` and `}}`: Hot Pink (RGB 255, 20, 147)
/// - Expression bodies: Cyan
/// - Unterminated bodies: Yellow
/// - Everything else: default style
pub fn highlight_line(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    for block in find_blocks(text) {
        if block.start > pos {
            spans.push(Span::raw(text[pos..block.start].to_string()));
        }
        spans.push(Span::styled(
            OPEN_DELIMITER,
            Style::default().fg(DELIMITER_COLOR),
        ));

        let body_color = if block.terminated {
            EXPRESSION_COLOR
        } else {
            UNTERMINATED_COLOR
        };
        if block.inner_end > block.inner_start {
            spans.push(Span::styled(
                text[block.inner_start..block.inner_end].to_string(),
                Style::default().fg(body_color),
            ));
        }

        if block.terminated {
            spans.push(Span::styled(
                CLOSE_DELIMITER,
                Style::default().fg(DELIMITER_COLOR),
            ));
        }
        pos = block.end;
    }

    if pos < text.len() {
        spans.push(Span::raw(text[pos..].to_string()));
    }
    spans
}
