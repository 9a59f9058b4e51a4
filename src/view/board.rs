//! The todo board: holds the last fetched list and routes UI intents to the
//! repository.

use super::form::TodoForm;
use super::item::{EditKey, ItemEditor};
use crate::db::{Outcome, Repository};
use crate::domain::{Todo, TodoId, TodoPatch};
use crate::error::StoreError;
use std::fmt::Write;
use std::sync::Arc;
use tracing::warn;

pub const EMPTY_MESSAGE: &str = "No todos yet";
pub const EDIT_HINT: &str = "Use `edit <id> <title>` to rename";

pub struct TodoBoard {
    repo: Arc<Repository>,
    form: TodoForm,
    todos: Vec<Todo>,
}

impl TodoBoard {
    pub fn new(repo: Arc<Repository>) -> Self {
        TodoBoard {
            repo,
            form: TodoForm::new(),
            todos: Vec::new(),
        }
    }

    /// The list as of the last successful refresh.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Re-fetch the full list from the store.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.todos = self.repo.list().await?;
        Ok(())
    }

    /// Submit text from the "new todo" input.
    ///
    /// Returns `None` without touching the store when the trimmed input is
    /// blank.
    pub async fn submit(&mut self, input: &str) -> Result<Option<TodoId>, StoreError> {
        self.form.set_draft(input);
        let Some(title) = self.form.submit() else {
            return Ok(None);
        };

        let id = self.repo.create(&title).await?;
        self.refresh_after_mutation().await;
        Ok(Some(id))
    }

    /// Flip `completed` on a listed todo.
    pub async fn toggle(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        let Some(todo) = self.find(id) else {
            return Ok(Outcome::NoOp);
        };
        let patch = TodoPatch::completed(!todo.completed);

        let outcome = self.repo.update(id, &patch).await?;
        self.refresh_after_mutation().await;
        Ok(outcome)
    }

    /// Rename a listed todo through its inline editor.
    ///
    /// Blank or unchanged text is a no-op, as is `None` (a cancelled edit).
    pub async fn rename(&mut self, id: TodoId, text: Option<&str>) -> Result<Outcome, StoreError> {
        let Some(todo) = self.find(id) else {
            return Ok(Outcome::NoOp);
        };

        let mut editor = ItemEditor::new(todo);
        editor.begin_edit();
        let key = match text {
            Some(text) => {
                editor.set_text(text);
                EditKey::Enter
            }
            None => EditKey::Escape,
        };
        let Some(title) = editor.handle_key(key) else {
            return Ok(Outcome::NoOp);
        };

        let outcome = self.repo.update(id, &TodoPatch::title(title)).await?;
        self.refresh_after_mutation().await;
        Ok(outcome)
    }

    pub async fn remove(&mut self, id: TodoId) -> Result<Outcome, StoreError> {
        let outcome = self.repo.delete(id).await?;
        self.refresh_after_mutation().await;
        Ok(outcome)
    }

    /// Refresh is best-effort after a write: the write already succeeded, so a
    /// failed read only leaves the view stale.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Failed to refresh todo list after mutation");
        }
    }

    /// Plain-text rendering of the current list.
    pub fn render(&self) -> String {
        if self.todos.is_empty() {
            return format!("{}\n", EMPTY_MESSAGE);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", EDIT_HINT);
        for todo in &self.todos {
            let mark = if todo.completed { 'x' } else { ' ' };
            let created = todo
                .created_at
                .to_datetime()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{:>4} [{}] {}  ({})",
                todo.id.as_i64(),
                mark,
                todo.title,
                created
            );
        }
        out
    }
}
