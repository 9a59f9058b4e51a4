//! Presentation glue over the repository.
//!
//! - `form` - the "new todo" input
//! - `item` - per-item inline edit state
//! - `board` - list state, re-fetched after every mutation
//! - `command` - line commands for the terminal host

pub mod board;
pub mod command;
pub mod form;
pub mod item;

pub use board::TodoBoard;
pub use command::Command;
pub use form::TodoForm;
pub use item::{EditKey, ItemEditor};
