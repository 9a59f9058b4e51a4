//! The todo entity, its validated title, and partial updates.

use super::primitives::{TimeMs, TodoId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("title must not be empty")]
    Empty,
}

/// Non-empty todo title.
///
/// Whitespace-only text is rejected. The text is stored as given; trimming
/// user input is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, TitleError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TitleError::Empty);
        }
        Ok(Title(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Title {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Title::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: Title,
    pub completed: bool,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

/// A todo that has not been inserted yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: Title,
    pub completed: bool,
    pub created_at: TimeMs,
    pub updated_at: TimeMs,
}

impl NewTodo {
    pub fn new(title: Title, now: TimeMs) -> Self {
        NewTodo {
            title,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields to change on an existing todo. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: Title) -> Self {
        TodoPatch {
            title: Some(title),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        TodoPatch {
            title: None,
            completed: Some(completed),
        }
    }

    pub fn with_title(mut self, title: Title) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Apply `patch` over `existing`.
///
/// `id` and `created_at` are carried over unchanged. `updated_at` is always
/// refreshed, even for an empty patch, and never moves backwards if the clock
/// does.
pub fn merge(existing: &Todo, patch: &TodoPatch, now: TimeMs) -> Todo {
    Todo {
        id: existing.id,
        title: patch
            .title
            .clone()
            .unwrap_or_else(|| existing.title.clone()),
        completed: patch.completed.unwrap_or(existing.completed),
        created_at: existing.created_at,
        updated_at: now.max(existing.updated_at),
    }
}
