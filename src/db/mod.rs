//! Database module for the SQLite-backed todo store.
//!
//! This module provides:
//! - Store opening, pragma configuration and schema bootstrap
//! - Short-lived, per-operation store handles
//! - Repository layer for todo operations

pub mod repo;
pub mod store;

pub use repo::{Outcome, Repository};
pub use store::{init_db, StoreHandle, TodoStore, TxnMode, SCHEMA_VERSION, STORE_NAME, TABLE_NAME};
