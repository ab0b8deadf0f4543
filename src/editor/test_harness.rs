//! Test harness for expression field integration tests
//!
//! Scripts key events against an `ExpressionField` without a terminal and
//! records every commit the field makes.

use super::*;
use crate::config::EngineConfig;
use crate::dialect::Dialect;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Test harness for scripting field interactions
pub struct FieldTestHarness {
    field: ExpressionField,
    commits: Rc<RefCell<Vec<String>>>,
}

impl FieldTestHarness {
    /// Empty field over `schema`, `json` dialect
    pub fn new(schema: Value) -> Self {
        Self::with_content(schema, "")
    }

    /// Field with initial content, cursor at the end
    pub fn with_content(schema: Value, content: &str) -> Self {
        Self::with_config(schema, content, EngineConfig::default())
    }

    /// Field with initial content in the given dialect
    pub fn with_dialect(schema: Value, content: &str, dialect: Dialect) -> Self {
        let config = EngineConfig {
            dialect,
            ..EngineConfig::default()
        };
        Self::with_config(schema, content, config)
    }

    fn with_config(schema: Value, content: &str, config: EngineConfig) -> Self {
        let commits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&commits);
        let field = ExpressionField::new("test", content, schema, config)
            .with_commit(move |text| sink.borrow_mut().push(text.to_string()));
        Self { field, commits }
    }

    /// Send a string of characters to the field
    pub fn type_text(&mut self, text: &str) -> &mut Self {
        for ch in text.chars() {
            let event = KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE);
            self.field.handle_key_event(event);
        }
        self
    }

    /// Send a key event
    pub fn send_key(&mut self, code: KeyCode) -> &mut Self {
        self.field.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
        self
    }

    pub fn tab(&mut self) -> &mut Self {
        self.send_key(KeyCode::Tab)
    }

    pub fn enter(&mut self) -> &mut Self {
        self.send_key(KeyCode::Enter)
    }

    pub fn escape(&mut self) -> &mut Self {
        self.send_key(KeyCode::Esc)
    }

    pub fn up(&mut self) -> &mut Self {
        self.send_key(KeyCode::Up)
    }

    pub fn down(&mut self) -> &mut Self {
        self.send_key(KeyCode::Down)
    }

    pub fn backspace(&mut self) -> &mut Self {
        self.send_key(KeyCode::Backspace)
    }

    /// Click a suggestion row
    pub fn click(&mut self, index: usize) -> &mut Self {
        self.field.click_suggestion(index);
        self
    }

    /// Drop a plain-text payload at `offset`
    pub fn drop_text(&mut self, offset: usize, payload: &str) -> &mut Self {
        self.field.drop_text(offset, payload);
        self
    }

    /// Direct access to the field
    pub fn field(&mut self) -> &mut ExpressionField {
        &mut self.field
    }

    pub fn content(&self) -> &str {
        self.field.text()
    }

    pub fn cursor_pos(&self) -> usize {
        self.field.cursor()
    }

    /// Every text the field committed, in order
    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    /// Check if the suggestion popup is shown
    pub fn is_completion_shown(&self) -> bool {
        self.field.completion_state().is_visible()
    }

    /// Suggestion paths currently shown
    pub fn completion_options(&self) -> Vec<String> {
        self.field
            .completion_state()
            .suggestions()
            .iter()
            .map(|s| s.path.clone())
            .collect()
    }

    /// The selected suggestion path (if any)
    pub fn selected_completion(&self) -> Option<String> {
        self.field
            .completion_state()
            .selected()
            .map(|s| s.path.clone())
    }

    /// Assert that the content equals expected
    pub fn assert_content(&mut self, expected: &str) -> &mut Self {
        let actual = self.content().to_string();
        assert_eq!(
            actual, expected,
            "\nExpected content: {:?}\nActual content: {:?}",
            expected, actual
        );
        self
    }

    /// Assert the caret staged for the host
    pub fn assert_pending_caret(&mut self, expected: usize) -> &mut Self {
        let caret = self.field.take_pending_caret();
        assert_eq!(caret, Some(expected), "unexpected staged caret");
        self
    }

    pub fn assert_completion_shown(&mut self) -> &mut Self {
        assert!(
            self.is_completion_shown(),
            "Expected suggestions to be shown, but they're hidden"
        );
        self
    }

    pub fn assert_completion_hidden(&mut self) -> &mut Self {
        assert!(
            !self.is_completion_shown(),
            "Expected suggestions to be hidden, but got: {:?}",
            self.completion_options()
        );
        self
    }

    /// Assert that suggestions contain a specific path
    pub fn assert_completion_contains(&mut self, option: &str) -> &mut Self {
        let options = self.completion_options();
        assert!(
            options.iter().any(|o| o == option),
            "Expected suggestions to contain {:?}, but got: {:?}",
            option,
            options
        );
        self
    }

    /// Assert that suggestions match exactly
    pub fn assert_completion_options(&mut self, expected: &[&str]) -> &mut Self {
        let actual = self.completion_options();
        assert_eq!(
            actual, expected,
            "\nExpected suggestions: {:?}\nActual suggestions: {:?}",
            expected, actual
        );
        self
    }

    pub fn assert_selected(&mut self, expected: &str) -> &mut Self {
        let selected = self.selected_completion();
        assert_eq!(selected.as_deref(), Some(expected));
        self
    }
}
