pub mod clock;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use db::{init_db, Outcome, Repository, TodoStore};
pub use domain::{TimeMs, Title, Todo, TodoId, TodoPatch};
pub use error::StoreError;
