//! Completion state machine
//!
//! Two states: `Idle` and `SuggestionsOpen`. The selection index is bounded
//! to the visible list and does not wrap.

use super::matching::Suggestion;

/// Popup phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPhase {
    /// No popup
    Idle,
    /// Popup visible with at least one suggestion
    SuggestionsOpen,
}

/// State of the suggestion popup
#[derive(Debug, Clone)]
pub struct CompletionState {
    phase: CompletionPhase,
    /// Available suggestions
    suggestions: Vec<Suggestion>,
    /// Currently selected index
    selected_index: usize,
}

impl CompletionState {
    /// Create a new idle state
    pub fn new() -> Self {
        Self {
            phase: CompletionPhase::Idle,
            suggestions: Vec::new(),
            selected_index: 0,
        }
    }

    /// Current phase
    pub fn phase(&self) -> CompletionPhase {
        self.phase
    }

    /// Check if the popup is visible
    pub fn is_visible(&self) -> bool {
        self.phase == CompletionPhase::SuggestionsOpen
    }

    /// Get the list of suggestions
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Get the currently selected index
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Get the currently selected suggestion
    pub fn selected(&self) -> Option<&Suggestion> {
        if self.is_visible() {
            self.suggestions.get(self.selected_index)
        } else {
            None
        }
    }

    /// Feed a fresh ranking result
    ///
    /// Opens on a non-empty list and closes on an empty one. The selection
    /// survives a refresh only while it still points inside the new list.
    pub fn update(&mut self, suggestions: Vec<Suggestion>) {
        if suggestions.is_empty() {
            self.hide();
            return;
        }
        let keep_selection = self.is_visible() && self.suggestions == suggestions;
        self.phase = CompletionPhase::SuggestionsOpen;
        self.suggestions = suggestions;
        if !keep_selection {
            self.selected_index = 0;
        }
    }

    /// Hide the popup
    pub fn hide(&mut self) {
        self.phase = CompletionPhase::Idle;
        self.suggestions.clear();
        self.selected_index = 0;
    }

    /// Move selection down, stopping at the last item
    pub fn next(&mut self) {
        if self.is_visible() && self.selected_index + 1 < self.suggestions.len() {
            self.selected_index += 1;
        }
    }

    /// Move selection up, stopping at the first item
    pub fn previous(&mut self) {
        if self.is_visible() && self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Select a specific row (mouse click); out-of-range rows are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if self.is_visible() && index < self.suggestions.len() {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// Take the current selection and go idle
    pub fn accept(&mut self) -> Option<Suggestion> {
        let suggestion = self.selected().cloned();
        self.hide();
        suggestion
    }
}

impl Default for CompletionState {
    fn default() -> Self {
        Self::new()
    }
}
