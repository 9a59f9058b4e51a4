//! Edit state for a single rendered todo.

use crate::domain::{Title, Todo};

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EditState {
    Viewing,
    Editing { text: String },
}

/// Inline title editor for one todo.
///
/// `save` only yields a title when the trimmed text is non-empty and differs
/// from the current one, so untouched edits never reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEditor {
    current: Title,
    state: EditState,
}

impl ItemEditor {
    pub fn new(todo: &Todo) -> Self {
        ItemEditor {
            current: todo.title.clone(),
            state: EditState::Viewing,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Text in the edit box, if editing.
    pub fn text(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { text } => Some(text.as_str()),
            EditState::Viewing => None,
        }
    }

    /// Enter edit mode with the box reset to the current title.
    pub fn begin_edit(&mut self) {
        self.state = EditState::Editing {
            text: self.current.as_str().to_string(),
        };
    }

    pub fn set_text(&mut self, new_text: impl Into<String>) {
        if let EditState::Editing { text } = &mut self.state {
            *text = new_text.into();
        }
    }

    /// Enter saves, Escape cancels, anything else is ignored.
    pub fn handle_key(&mut self, key: EditKey) -> Option<Title> {
        match key {
            EditKey::Enter => self.save(),
            EditKey::Escape => {
                self.cancel();
                None
            }
            EditKey::Other => None,
        }
    }

    /// Leave edit mode, returning the new title if it should be written.
    pub fn save(&mut self) -> Option<Title> {
        let state = std::mem::replace(&mut self.state, EditState::Viewing);
        let EditState::Editing { text } = state else {
            return None;
        };

        let title = Title::new(text.trim()).ok()?;
        if title == self.current {
            return None;
        }
        self.current = title.clone();
        Some(title)
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Viewing;
    }
}
