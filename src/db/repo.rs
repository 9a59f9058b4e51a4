//! Repository layer for todo operations.
//!
//! Each public method acquires its own store handle, runs one transaction,
//! and releases the handle on every exit path.

use crate::clock::{Clock, SystemClock};
use crate::db::store::{StoreHandle, TodoStore, TxnMode};
use crate::domain::{merge, sort_newest_first, NewTodo, TimeMs, Title, Todo, TodoId, TodoPatch};
use crate::error::StoreError;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

/// Result of a mutation that targets an existing todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The todo existed and was changed.
    Applied,
    /// No todo had that id; nothing was written.
    NoOp,
}

/// Repository for todo operations.
#[derive(Debug, Clone)]
pub struct Repository {
    store: TodoStore,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Create a repository stamping times from the system clock.
    pub fn new(store: TodoStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: TodoStore, clock: Arc<dyn Clock>) -> Self {
        Repository { store, clock }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Insert a new todo and return its store-assigned id.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be opened, `WriteFailed`
    /// if the insert is rejected.
    pub async fn create(&self, title: &Title) -> Result<TodoId, StoreError> {
        let todo = NewTodo::new(title.clone(), self.clock.now());

        let mut handle = self.store.acquire().await?;
        let result = insert_todo(&mut handle, &todo).await;
        handle.release().await;

        let id = result.map_err(StoreError::write_failed)?;
        debug!(id = %id, "Created todo");
        Ok(id)
    }

    /// All todos, newest first by creation time.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be opened, `ReadFailed`
    /// if the read fails.
    pub async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let mut handle = self.store.acquire().await?;
        let result = fetch_all(&mut handle).await;
        handle.release().await;

        let mut todos = result.map_err(StoreError::read_failed)?;
        sort_newest_first(&mut todos);
        Ok(todos)
    }

    /// Look up a single todo.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be opened, `ReadFailed`
    /// if the read fails.
    pub async fn get(&self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let mut handle = self.store.acquire().await?;
        let result = fetch_one(&mut handle, id).await;
        handle.release().await;

        result.map_err(StoreError::read_failed)
    }

    /// Merge `patch` onto the todo with `id` and refresh its `updated_at`.
    ///
    /// A missing id is a no-op: nothing is created.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be opened, `WriteFailed`
    /// if the read-modify-write fails.
    pub async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Outcome, StoreError> {
        let mut handle = self.store.acquire().await?;
        let result = update_todo(&mut handle, id, patch, self.clock.as_ref()).await;
        handle.release().await;

        let outcome = result.map_err(StoreError::write_failed)?;
        debug!(id = %id, ?outcome, "Updated todo");
        Ok(outcome)
    }

    /// Remove the todo with `id`. A missing id is a no-op.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the store cannot be opened, `WriteFailed`
    /// if the delete fails.
    pub async fn delete(&self, id: TodoId) -> Result<Outcome, StoreError> {
        let mut handle = self.store.acquire().await?;
        let result = delete_todo(&mut handle, id).await;
        handle.release().await;

        let outcome = result.map_err(StoreError::write_failed)?;
        debug!(id = %id, ?outcome, "Deleted todo");
        Ok(outcome)
    }
}

async fn insert_todo(handle: &mut StoreHandle, todo: &NewTodo) -> Result<TodoId, sqlx::Error> {
    handle.begin(TxnMode::ReadWrite).await?;
    let result = sqlx::query(
        r#"
        INSERT INTO todos (title, completed, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(todo.title.as_str())
    .bind(todo.completed)
    .bind(todo.created_at.as_i64())
    .bind(todo.updated_at.as_i64())
    .execute(handle.connection())
    .await?;
    handle.commit().await?;

    Ok(TodoId::new(result.last_insert_rowid()))
}

async fn fetch_all(handle: &mut StoreHandle) -> Result<Vec<Todo>, sqlx::Error> {
    handle.begin(TxnMode::ReadOnly).await?;
    let rows = sqlx::query(
        r#"
        SELECT id, title, completed, created_at, updated_at
        FROM todos
        ORDER BY id ASC
        "#,
    )
    .fetch_all(handle.connection())
    .await?;
    handle.commit().await?;

    rows.iter().map(todo_from_row).collect()
}

async fn fetch_one(handle: &mut StoreHandle, id: TodoId) -> Result<Option<Todo>, sqlx::Error> {
    handle.begin(TxnMode::ReadOnly).await?;
    let todo = select_by_id(handle.connection(), id).await?;
    handle.commit().await?;
    Ok(todo)
}

async fn update_todo(
    handle: &mut StoreHandle,
    id: TodoId,
    patch: &TodoPatch,
    clock: &dyn Clock,
) -> Result<Outcome, sqlx::Error> {
    handle.begin(TxnMode::ReadWrite).await?;

    let Some(existing) = select_by_id(handle.connection(), id).await? else {
        handle.commit().await?;
        return Ok(Outcome::NoOp);
    };

    let merged = merge(&existing, patch, clock.now());
    sqlx::query(
        r#"
        UPDATE todos
        SET title = ?, completed = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(merged.title.as_str())
    .bind(merged.completed)
    .bind(merged.updated_at.as_i64())
    .bind(merged.id.as_i64())
    .execute(handle.connection())
    .await?;
    handle.commit().await?;

    Ok(Outcome::Applied)
}

async fn delete_todo(handle: &mut StoreHandle, id: TodoId) -> Result<Outcome, sqlx::Error> {
    handle.begin(TxnMode::ReadWrite).await?;
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(id.as_i64())
        .execute(handle.connection())
        .await?;
    handle.commit().await?;

    if result.rows_affected() > 0 {
        Ok(Outcome::Applied)
    } else {
        Ok(Outcome::NoOp)
    }
}

async fn select_by_id(conn: &mut SqliteConnection, id: TodoId) -> Result<Option<Todo>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, title, completed, created_at, updated_at
        FROM todos
        WHERE id = ?
        "#,
    )
    .bind(id.as_i64())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(todo_from_row).transpose()
}

fn todo_from_row(row: &SqliteRow) -> Result<Todo, sqlx::Error> {
    let title: String = row.try_get("title")?;
    let title = Title::new(title).map_err(|e| sqlx::Error::ColumnDecode {
        index: "title".to_string(),
        source: Box::new(e),
    })?;

    Ok(Todo {
        id: TodoId::new(row.try_get("id")?),
        title,
        completed: row.try_get("completed")?,
        created_at: TimeMs::new(row.try_get("created_at")?),
        updated_at: TimeMs::new(row.try_get("updated_at")?),
    })
}
