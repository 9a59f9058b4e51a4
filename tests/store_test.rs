use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};
use tododb::db::{init_db, TodoStore, SCHEMA_VERSION, TABLE_NAME};
use tododb::{Repository, StoreError, Title, TodoPatch};

fn db_path(temp_dir: &TempDir) -> std::path::PathBuf {
    temp_dir.path().join("TodoDB.sqlite3")
}

#[tokio::test]
async fn test_first_acquire_creates_schema() {
    let temp_dir = TempDir::new().unwrap();
    let store = TodoStore::new(db_path(&temp_dir));

    let mut handle = assert_ok!(store.acquire().await);

    let (name,): (String,) =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
            .bind(TABLE_NAME)
            .fetch_one(handle.connection())
            .await
            .expect("todos table missing");
    assert_eq!(name, "todos");

    let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
        .fetch_one(handle.connection())
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);

    // AUTOINCREMENT tables keep their high-water mark here.
    let (seq_tables,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='sqlite_sequence'",
    )
    .fetch_one(handle.connection())
    .await
    .unwrap();
    assert_eq!(seq_tables, 1);

    handle.release().await;
}

#[tokio::test]
async fn test_concurrent_first_acquires() {
    let temp_dir = TempDir::new().unwrap();
    let store = TodoStore::new(db_path(&temp_dir));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let store = store.clone();
        tasks.spawn(async move {
            let handle = store.acquire().await?;
            handle.release().await;
            Ok::<(), StoreError>(())
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("task panicked").expect("acquire failed");
    }

    let mut handle = store.acquire().await.unwrap();
    let (tables,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='todos'")
            .fetch_one(handle.connection())
            .await
            .unwrap();
    assert_eq!(tables, 1);
    handle.release().await;
}

#[tokio::test]
async fn test_newer_schema_version_is_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let store = init_db(db_path(&temp_dir)).await.unwrap();

    let mut handle = store.acquire().await.unwrap();
    sqlx::query("PRAGMA user_version = 2")
        .execute(handle.connection())
        .await
        .unwrap();
    handle.release().await;

    match store.acquire().await {
        Err(StoreError::StoreUnavailable(msg)) => assert!(msg.contains("version conflict")),
        Err(other) => panic!("Expected StoreUnavailable, got {:?}", other),
        Ok(_) => panic!("Expected StoreUnavailable, got a handle"),
    }

    let repo = Repository::new(store);
    assert_err!(repo.list().await);
}

#[tokio::test]
async fn test_init_db_unopenable_path() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();

    match init_db(blocker.join("TodoDB.sqlite3")).await {
        Err(StoreError::StoreUnavailable(_)) => {}
        Err(other) => panic!("Expected StoreUnavailable, got {:?}", other),
        Ok(_) => panic!("Expected StoreUnavailable, got a store"),
    }
}

#[tokio::test]
async fn test_delete_store_removes_data() {
    let temp_dir = TempDir::new().unwrap();
    let store = init_db(db_path(&temp_dir)).await.unwrap();
    let repo = Repository::new(store.clone());

    repo.create(&Title::new("gone soon").unwrap()).await.unwrap();
    assert_ok!(store.delete_store().await);
    assert!(!store.database_path().exists());

    // Next operation recreates an empty store.
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_store_missing_is_ok() {
    let temp_dir = TempDir::new().unwrap();
    let store = TodoStore::new(db_path(&temp_dir));
    assert_ok!(store.delete_store().await);
}

#[tokio::test]
async fn test_check_constraints_reject_invalid_rows() {
    let temp_dir = TempDir::new().unwrap();
    let store = init_db(db_path(&temp_dir)).await.unwrap();

    let mut handle = store.acquire().await.unwrap();
    let result = sqlx::query(
        "INSERT INTO todos (title, completed, created_at, updated_at) VALUES ('  ', 0, 1, 1)",
    )
    .execute(handle.connection())
    .await;
    assert!(result.is_err(), "blank title should violate CHECK");

    let result = sqlx::query(
        "INSERT INTO todos (title, completed, created_at, updated_at) VALUES ('ok', 0, 5, 1)",
    )
    .execute(handle.connection())
    .await;
    assert!(result.is_err(), "updated_at before created_at should violate CHECK");
    handle.release().await;
}

#[tokio::test]
async fn test_rejected_writes_are_write_failed_and_roll_back() {
    let temp_dir = TempDir::new().unwrap();
    let store = init_db(db_path(&temp_dir)).await.unwrap();
    let repo = Repository::new(store.clone());
    let id = repo.create(&Title::new("keep").unwrap()).await.unwrap();

    let mut handle = store.acquire().await.unwrap();
    for statement in [
        "CREATE TRIGGER reject_insert BEFORE INSERT ON todos BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        "CREATE TRIGGER reject_update BEFORE UPDATE ON todos BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        "CREATE TRIGGER reject_delete BEFORE DELETE ON todos BEGIN SELECT RAISE(ABORT, 'rejected'); END",
    ] {
        sqlx::query(statement)
            .execute(handle.connection())
            .await
            .unwrap();
    }
    handle.release().await;

    let title = Title::new("nope").unwrap();
    assert!(matches!(
        repo.create(&title).await,
        Err(StoreError::WriteFailed(_))
    ));
    assert!(matches!(
        repo.update(id, &TodoPatch::title(title.clone())).await,
        Err(StoreError::WriteFailed(_))
    ));
    assert!(matches!(
        repo.delete(id).await,
        Err(StoreError::WriteFailed(_))
    ));

    let todos = repo.list().await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title.as_str(), "keep");
}
