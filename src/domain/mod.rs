//! Domain types for the todo store.
//!
//! This module provides:
//! - Domain primitives: TimeMs, TodoId
//! - The Todo entity with its validated Title
//! - TodoPatch and the pure merge used by updates
//! - Newest-first ordering for list reads

pub mod ordering;
pub mod primitives;
pub mod todo;

pub use ordering::sort_newest_first;
pub use primitives::{TimeMs, TodoId};
pub use todo::{merge, NewTodo, Title, TitleError, Todo, TodoPatch};
