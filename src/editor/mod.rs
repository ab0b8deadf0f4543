//! Expression field editor surface
//!
//! Wires key events to the completion pipeline for one editable field.
//! The field owns its text and cursor, re-runs locator and ranker after
//! every change, and reports the full text to the host through a commit
//! callback.

mod registry;
mod render;
pub mod test_harness;

pub use registry::{FieldRegistry, LiteralSink};
pub use render::{highlight_line, suggestion_lines};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use tracing::{debug, warn};

use crate::completion::{
    clamp_cursor, flatten, plan_edit, plan_literal, suggest, CompletionState, EditPlan, Suggestion,
    VariableNode,
};
use crate::config::EngineConfig;

/// Called with the full text after every change
pub type CommitCallback = Box<dyn FnMut(&str)>;
/// Called with the field id when the field takes focus
pub type FocusCallback = Box<dyn FnMut(&str)>;

/// What a key event did to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Text changed
    Edited,
    /// Cursor or selection moved
    Navigated,
    /// A suggestion was applied
    Accepted,
    /// The popup was closed
    Dismissed,
    /// Nothing happened
    Ignored,
}

/// One editable text field with expression completion
pub struct ExpressionField {
    id: String,
    text: String,
    cursor: usize,
    /// Variable tree, replaced wholesale by the host
    schema: Value,
    /// Flattening of `schema`, computed once per schema change
    nodes: Vec<VariableNode>,
    config: EngineConfig,
    completion_state: CompletionState,
    /// Caret staged for the host's next tick
    pending_caret: Option<usize>,
    on_commit: Option<CommitCallback>,
    on_focus: Option<FocusCallback>,
}

impl ExpressionField {
    /// Create a field with the cursor at the end of `text`
    pub fn new(id: impl Into<String>, text: impl Into<String>, schema: Value, config: EngineConfig) -> Self {
        let text = text.into();
        let nodes = flatten(&schema, "");
        Self {
            id: id.into(),
            cursor: text.len(),
            text,
            schema,
            nodes,
            config,
            completion_state: CompletionState::new(),
            pending_caret: None,
            on_commit: None,
            on_focus: None,
        }
    }

    /// Register the commit callback
    pub fn with_commit(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_commit = Some(Box::new(callback));
        self
    }

    /// Register the focus callback
    pub fn with_focus(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_focus = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn nodes(&self) -> &[VariableNode] {
        &self.nodes
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn completion_state(&self) -> &CompletionState {
        &self.completion_state
    }

    /// Replace the variable tree
    pub fn set_schema(&mut self, schema: Value) {
        self.nodes = flatten(&schema, "");
        self.schema = schema;
        debug!(field = %self.id, nodes = self.nodes.len(), "schema replaced");
        if self.completion_state.is_visible() {
            self.refresh_suggestions();
        }
    }

    /// Take text and cursor from a host that owns raw input
    pub fn set_input(&mut self, text: impl Into<String>, cursor: usize) {
        self.text = text.into();
        self.cursor = clamp_cursor(&self.text, cursor);
        self.commit();
        self.refresh_suggestions();
    }

    /// Notify the host that this field has focus
    pub fn focus(&mut self) {
        if let Some(callback) = self.on_focus.as_mut() {
            callback(&self.id);
        }
    }

    /// Hand the staged caret to the host once it has taken the new text
    ///
    /// Returns `None` when no edit was applied since the last call.
    pub fn take_pending_caret(&mut self) -> Option<usize> {
        let caret = self.pending_caret.take()?;
        if caret > self.text.len() {
            warn!(field = %self.id, caret, len = self.text.len(), "staged caret past end of text");
        }
        Some(clamp_cursor(&self.text, caret))
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> KeyOutcome {
        let popup = self.completion_state.is_visible();
        match key.code {
            KeyCode::Char(_)
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                KeyOutcome::Ignored
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                KeyOutcome::Edited
            }
            KeyCode::Backspace => {
                if self.delete_char() {
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Enter | KeyCode::Tab if popup => match self.accept_selected() {
                Some(_) => KeyOutcome::Accepted,
                None => KeyOutcome::Ignored,
            },
            KeyCode::Enter => {
                self.insert_char('\n');
                KeyOutcome::Edited
            }
            KeyCode::Up if popup => {
                self.completion_state.previous();
                KeyOutcome::Navigated
            }
            KeyCode::Down if popup => {
                self.completion_state.next();
                KeyOutcome::Navigated
            }
            KeyCode::Esc if popup => {
                self.cancel_completion();
                KeyOutcome::Dismissed
            }
            KeyCode::Left => {
                self.cancel_completion();
                self.move_cursor_left();
                KeyOutcome::Navigated
            }
            KeyCode::Right => {
                self.cancel_completion();
                self.move_cursor_right();
                KeyOutcome::Navigated
            }
            KeyCode::Home => {
                self.cancel_completion();
                self.cursor = 0;
                KeyOutcome::Navigated
            }
            KeyCode::End => {
                self.cancel_completion();
                self.cursor = self.text.len();
                KeyOutcome::Navigated
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Apply the highlighted suggestion
    pub fn accept_selected(&mut self) -> Option<usize> {
        let suggestion = self.completion_state.accept()?;
        Some(self.accept(&suggestion))
    }

    /// Apply a suggestion picked by mouse
    pub fn click_suggestion(&mut self, index: usize) -> Option<usize> {
        if self.completion_state.select(index) {
            self.accept_selected()
        } else {
            None
        }
    }

    /// Apply `suggestion` at the current cursor, returning the new caret
    ///
    /// The plan is derived from the live text and cursor, never from the
    /// state captured when the popup was last refreshed.
    pub fn accept(&mut self, suggestion: &Suggestion) -> usize {
        let plan = plan_edit(&self.text, self.cursor, suggestion, self.config.dialect);
        debug!(field = %self.id, path = %suggestion.path, "accepting suggestion");
        self.apply_plan(plan)
    }

    /// Splice `literal` verbatim at the cursor, returning the new caret
    pub fn insert_literal(&mut self, literal: &str) -> usize {
        let plan = plan_literal(&self.text, self.cursor, literal);
        self.apply_plan(plan)
    }

    /// Splice a drag-and-drop payload verbatim at `offset`, returning the new caret
    pub fn drop_text(&mut self, offset: usize, payload: &str) -> usize {
        let plan = plan_literal(&self.text, offset, payload);
        self.apply_plan(plan)
    }

    fn apply_plan(&mut self, plan: EditPlan) -> usize {
        self.text = plan.apply(&self.text);
        self.cursor = plan.caret_after;
        self.pending_caret = Some(plan.caret_after);
        self.completion_state.hide();
        self.commit();
        plan.caret_after
    }

    fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.commit();
        self.refresh_suggestions();
    }

    fn delete_char(&mut self) -> bool {
        let prev = match self.text[..self.cursor].chars().next_back() {
            Some(c) => c,
            None => return false,
        };
        self.cursor -= prev.len_utf8();
        self.text.remove(self.cursor);
        self.commit();
        self.refresh_suggestions();
        true
    }

    fn move_cursor_left(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    fn move_cursor_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn cancel_completion(&mut self) {
        self.completion_state.hide();
    }

    /// Re-run locator and ranker against the current text and cursor
    fn refresh_suggestions(&mut self) {
        match suggest(
            &self.text,
            self.cursor,
            &self.nodes,
            self.config.dialect,
            self.config.page_size,
        ) {
            Some((block, suggestions)) => {
                debug!(
                    field = %self.id,
                    anchor = ?block.anchor,
                    count = suggestions.len(),
                    "refreshed suggestions"
                );
                self.completion_state.update(suggestions);
            }
            None => self.completion_state.hide(),
        }
    }

    fn commit(&mut self) {
        if let Some(callback) = self.on_commit.as_mut() {
            callback(&self.text);
        }
    }
}

impl std::fmt::Debug for ExpressionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpressionField")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("phase", &self.completion_state.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn field(text: &str) -> ExpressionField {
        ExpressionField::new(
            "body",
            text,
            json!({ "json": { "user": { "name": "A" }, "id": 1 } }),
            EngineConfig::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_places_cursor_at_end() {
        let f = field("abc");
        assert_eq!(f.cursor(), 3);
        assert_eq!(f.nodes().len(), 4);
    }

    #[test]
    fn test_typing_opens_and_closes_popup() {
        let mut f = field("Hello ${{ json");
        f.handle_key_event(key(KeyCode::Char('.')));
        assert!(f.completion_state().is_visible());
        assert_eq!(f.completion_state().suggestions()[0].path, "json.user");

        for c in "zzz".chars() {
            f.handle_key_event(key(KeyCode::Char(c)));
        }
        assert!(!f.completion_state().is_visible());
    }

    #[test]
    fn test_commit_on_every_change() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut f = field("").with_commit(move |text| sink.borrow_mut().push(text.to_string()));

        f.handle_key_event(key(KeyCode::Char('a')));
        f.handle_key_event(key(KeyCode::Char('b')));
        f.handle_key_event(key(KeyCode::Backspace));
        f.insert_literal("{x}");

        assert_eq!(*log.borrow(), ["a", "ab", "a", "a{x}"]);
    }

    #[test]
    fn test_enter_accepts_and_stages_caret() {
        let mut f = field("${{ json.");
        f.handle_key_event(key(KeyCode::Char('u')));
        assert_eq!(f.handle_key_event(key(KeyCode::Enter)), KeyOutcome::Accepted);
        assert_eq!(f.text(), "${{ json.user");
        assert!(!f.completion_state().is_visible());
        assert_eq!(f.take_pending_caret(), Some(13));
        assert_eq!(f.take_pending_caret(), None);
    }

    #[test]
    fn test_enter_without_popup_inserts_newline() {
        let mut f = field("a");
        assert_eq!(f.handle_key_event(key(KeyCode::Enter)), KeyOutcome::Edited);
        assert_eq!(f.text(), "a\n");
    }

    #[test]
    fn test_escape_dismisses() {
        let mut f = field("${{ json");
        f.handle_key_event(key(KeyCode::Char('.')));
        assert_eq!(f.handle_key_event(key(KeyCode::Esc)), KeyOutcome::Dismissed);
        assert!(!f.completion_state().is_visible());
        assert_eq!(f.handle_key_event(key(KeyCode::Esc)), KeyOutcome::Ignored);
    }

    #[test]
    fn test_accept_uses_live_cursor() {
        let mut f = field("${{ json.");
        f.handle_key_event(key(KeyCode::Char('u')));
        let stale = f.completion_state().suggestions()[0].clone();
        // Host edits the text behind the popup's back
        f.set_input("${{ json.user.", 14);
        f.accept(&Suggestion::new("json.user.name", stale.kind));
        assert_eq!(f.text(), "${{ json.user.name");
    }

    #[test]
    fn test_unchanged_list_keeps_selection_while_typing() {
        let mut f = field("${{ json.");
        f.handle_key_event(key(KeyCode::Char(' ')));
        f.handle_key_event(key(KeyCode::Down));
        let selected = f.completion_state().selected_index();
        // Whitespace still lists the root children, so the popup keeps its row
        f.handle_key_event(key(KeyCode::Char(' ')));
        assert_eq!(f.completion_state().selected_index(), selected);
        f.handle_key_event(key(KeyCode::Char('u')));
        assert!(f.completion_state().is_visible());
        assert_eq!(f.completion_state().selected_index(), 0);
    }

    #[test]
    fn test_drop_text_at_offset() {
        let mut f = field("ab");
        let caret = f.drop_text(1, "${{ json.id }}");
        assert_eq!(f.text(), "a${{ json.id }}b");
        assert_eq!(caret, 15);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut f = field("é");
        f.handle_key_event(key(KeyCode::Left));
        assert_eq!(f.cursor(), 0);
        f.handle_key_event(key(KeyCode::Right));
        assert_eq!(f.cursor(), 2);
        f.handle_key_event(key(KeyCode::Backspace));
        assert_eq!(f.text(), "");
    }

    #[test]
    fn test_control_chars_ignored() {
        let mut f = field("");
        let outcome = f.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(f.text(), "");
    }

    #[test]
    fn test_set_schema_refreshes_open_popup() {
        let mut f = field("${{ json");
        f.handle_key_event(key(KeyCode::Char('.')));
        f.set_schema(json!({ "json": { "other": true } }));
        let paths: Vec<&str> = f
            .completion_state()
            .suggestions()
            .iter()
            .map(|s| s.path.as_str())
            .collect();
        assert_eq!(paths, ["json.other"]);
    }

    #[test]
    fn test_focus_callback() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let mut f = field("").with_focus(move |id| *sink.borrow_mut() = Some(id.to_string()));
        f.focus();
        assert_eq!(seen.borrow().as_deref(), Some("body"));
    }
}
