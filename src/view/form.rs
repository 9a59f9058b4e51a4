use crate::domain::Title;

/// Draft state of the "new todo" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    draft: String,
}

impl TodoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Turn the draft into a title to create.
    ///
    /// The draft is trimmed. Blank drafts are left in place and yield `None`;
    /// otherwise the draft is cleared.
    pub fn submit(&mut self) -> Option<Title> {
        let title = Title::new(self.draft.trim()).ok()?;
        self.draft.clear();
        Some(title)
    }
}
