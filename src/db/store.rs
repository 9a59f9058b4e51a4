//! Store handle management: opening the todo store and bootstrapping its schema.
//!
//! Every operation acquires its own [`StoreHandle`] and releases it when done.
//! There is no pooling; a handle is one SQLite connection.

use crate::error::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default store name.
pub const STORE_NAME: &str = "TodoDB";
/// Schema version recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;
/// The single table holding todos.
pub const TABLE_NAME: &str = "todos";

const SCHEMA_SQL: &str = include_str!("schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Transaction flavour for a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnMode {
    ReadOnly,
    /// Takes the write lock up front so concurrent writers queue on the busy
    /// timeout instead of failing on lock upgrade.
    ReadWrite,
}

impl TxnMode {
    fn begin_sql(self) -> &'static str {
        match self {
            TxnMode::ReadOnly => "BEGIN DEFERRED",
            TxnMode::ReadWrite => "BEGIN IMMEDIATE",
        }
    }
}

/// Opens the todo store and hands out one handle per operation.
#[derive(Debug, Clone)]
pub struct TodoStore {
    database_path: PathBuf,
}

impl TodoStore {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        TodoStore {
            database_path: database_path.into(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Open the store, creating it and its schema if absent.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the file cannot be opened, the schema
    /// cannot be created, or the store carries a newer schema version.
    pub async fn acquire(&self) -> Result<StoreHandle, StoreError> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.database_path)
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| {
                warn!(path = %self.database_path.display(), error = %e, "Failed to open todo store");
                StoreError::unavailable(e)
            })?;

        if let Err(e) = prepare(&mut conn).await {
            warn!(path = %self.database_path.display(), error = %e, "Failed to prepare todo store");
            if let Err(close_err) = conn.close().await {
                warn!(error = %close_err, "Failed to close connection after prepare error");
            }
            return Err(e);
        }

        debug!(path = %self.database_path.display(), "Acquired store handle");
        Ok(StoreHandle { conn, txn: None })
    }

    /// Remove the store's database file and its WAL/SHM side files.
    ///
    /// Files that do not exist are skipped.
    pub async fn delete_store(&self) -> Result<(), StoreError> {
        let base = self.database_path.as_os_str().to_owned();
        let mut paths = vec![self.database_path.clone()];
        for suffix in ["-wal", "-shm"] {
            let mut side = base.clone();
            side.push(suffix);
            paths.push(PathBuf::from(side));
        }

        for path in paths {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed store file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::unavailable(e)),
            }
        }

        info!(path = %self.database_path.display(), "Todo store deleted");
        Ok(())
    }
}

/// Create the store and its schema up front, failing fast if it cannot be
/// opened.
pub async fn init_db(database_path: impl Into<PathBuf>) -> Result<TodoStore, StoreError> {
    let store = TodoStore::new(database_path);
    store.acquire().await?.release().await;
    info!(path = %store.database_path.display(), "Todo store initialized");
    Ok(store)
}

/// A live connection to the store, scoped to one operation.
///
/// Call [`StoreHandle::release`] when the operation is finished; it rolls
/// back any transaction still open and closes the connection.
#[derive(Debug)]
pub struct StoreHandle {
    conn: SqliteConnection,
    txn: Option<TxnMode>,
}

impl StoreHandle {
    pub async fn begin(&mut self, mode: TxnMode) -> Result<(), sqlx::Error> {
        if self.txn.is_some() {
            return Err(sqlx::Error::Protocol(
                "transaction already open on this handle".to_string(),
            ));
        }
        sqlx::query(mode.begin_sql()).execute(&mut self.conn).await?;
        self.txn = Some(mode);
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<(), sqlx::Error> {
        if self.txn.is_some() {
            sqlx::query("COMMIT").execute(&mut self.conn).await?;
            self.txn = None;
        }
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        if self.txn.is_some() {
            // Clear first: a failed ROLLBACK leaves nothing we can retry.
            self.txn = None;
            sqlx::query("ROLLBACK").execute(&mut self.conn).await?;
        }
        Ok(())
    }

    pub fn in_transaction(&self) -> bool {
        self.txn.is_some()
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Abort any open transaction and close the connection.
    pub async fn release(mut self) {
        if let Some(mode) = self.txn {
            debug!(?mode, "Rolling back unfinished transaction");
            if let Err(e) = self.rollback().await {
                warn!(error = %e, "Rollback failed while releasing store handle");
            }
        }
        if let Err(e) = self.conn.close().await {
            warn!(error = %e, "Failed to close store handle");
        }
        debug!("Released store handle");
    }
}

async fn prepare(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    configure_pragmas_conn(conn)
        .await
        .map_err(StoreError::unavailable)?;
    ensure_schema(conn).await
}

/// Configure SQLite pragmas for durability and concurrent readers.
async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!(journal_mode = %journal_mode, "SQLite journal_mode configured");

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn user_version(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await
}

fn version_conflict(found: i64) -> StoreError {
    StoreError::StoreUnavailable(format!(
        "version conflict: store is at schema version {}, expected {}",
        found, SCHEMA_VERSION
    ))
}

/// Make sure the store is at `SCHEMA_VERSION`, creating the table if needed.
async fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let version = user_version(conn)
        .await
        .map_err(StoreError::unavailable)?;
    if version == SCHEMA_VERSION {
        return Ok(());
    }
    if version > SCHEMA_VERSION {
        return Err(version_conflict(version));
    }

    sqlx::query(TxnMode::ReadWrite.begin_sql())
        .execute(&mut *conn)
        .await
        .map_err(StoreError::unavailable)?;

    match upgrade(conn).await {
        Ok(()) => {
            sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map_err(StoreError::unavailable)?;
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                warn!(error = %rollback_err, "Failed to roll back schema upgrade");
            }
            Err(e)
        }
    }
}

/// Runs under the write lock taken by `ensure_schema`.
async fn upgrade(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    // Re-read: another handle may have finished the upgrade while we waited.
    let version = user_version(conn)
        .await
        .map_err(StoreError::unavailable)?;
    if version == SCHEMA_VERSION {
        return Ok(());
    }
    if version > SCHEMA_VERSION {
        return Err(version_conflict(version));
    }

    info!(from = version, to = SCHEMA_VERSION, "Creating todo store schema");
    for statement in SCHEMA_SQL.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed)
                .execute(&mut *conn)
                .await
                .map_err(StoreError::unavailable)?;
        }
    }

    let set_version = format!("PRAGMA user_version = {}", SCHEMA_VERSION);
    sqlx::query(&set_version)
        .execute(&mut *conn)
        .await
        .map_err(StoreError::unavailable)?;

    info!("Todo store schema ready");
    Ok(())
}
