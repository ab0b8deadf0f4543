//! Field registry
//!
//! A command channel for "insert this variable into the active field".
//! Fields register under an id; focus is ordinary state held here, and
//! external components (a variable browser, a drop target) route literal
//! insertions through the registry instead of holding field handles.

use std::collections::HashMap;

use super::ExpressionField;
use crate::error::{EngineError, EngineResult};

/// Something that accepts verbatim text at its caret
pub trait LiteralSink {
    /// Splice `text` at the caret and return the new caret
    fn insert_literal(&mut self, text: &str) -> usize;

    /// Called when the registry moves focus to this sink
    fn focused(&mut self) {}
}

impl LiteralSink for ExpressionField {
    fn insert_literal(&mut self, text: &str) -> usize {
        ExpressionField::insert_literal(self, text)
    }

    fn focused(&mut self) {
        self.focus();
    }
}

/// Fields by id plus the id of the one that last took focus
pub struct FieldRegistry<T: LiteralSink = ExpressionField> {
    fields: HashMap<String, T>,
    focused: Option<String>,
}

impl<T: LiteralSink> FieldRegistry<T> {
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
            focused: None,
        }
    }

    /// Register a field, returning any field it replaced
    pub fn register(&mut self, id: impl Into<String>, field: T) -> Option<T> {
        self.fields.insert(id.into(), field)
    }

    /// Remove a field; drops focus if it was focused
    pub fn unregister(&mut self, id: &str) -> Option<T> {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        self.fields.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.fields.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.fields.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Id of the focused field
    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Move focus to `id`
    pub fn focus(&mut self, id: &str) -> EngineResult<()> {
        let field = self
            .fields
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownField(id.to_string()))?;
        field.focused();
        self.focused = Some(id.to_string());
        Ok(())
    }

    /// Insert `text` into a specific field
    pub fn insert_into(&mut self, id: &str, text: &str) -> EngineResult<usize> {
        let field = self
            .fields
            .get_mut(id)
            .ok_or_else(|| EngineError::UnknownField(id.to_string()))?;
        Ok(field.insert_literal(text))
    }

    /// Insert `text` into whichever field last took focus
    pub fn insert_into_focused(&mut self, text: &str) -> EngineResult<usize> {
        let id = self.focused.clone().ok_or(EngineError::NoFocusedField)?;
        self.insert_into(&id, text)
    }
}

impl<T: LiteralSink> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
