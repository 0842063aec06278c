//! Tests for database initialization
//!
//! - Automatic database creation on first run
//! - Idempotent re-open of an existing database
//! - Schema tables present

use elp_common::db::init::{init_database, SCHEMA_VERSION};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("elp.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("elp.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
        .fetch_one(&pool2.unwrap())
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn test_schema_tables_exist() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("elp.db")).await.unwrap();

    for table in ["schema_version", "settings", "user_progress", "xp_awards"] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "missing table {}", table);
    }

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_negative_total_rejected_by_schema() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("elp.db")).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO user_progress (user_id, total_xp, created_at, updated_at) VALUES ('u1', -5, 'now', 'now')",
    )
    .execute(&pool)
    .await;

    assert!(result.is_err(), "CHECK constraint should reject negative XP");
}

#[tokio::test]
async fn test_shared_secret_generated_once() {
    use elp_common::api::auth::load_shared_secret;

    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("elp.db")).await.unwrap();

    let first = load_shared_secret(&pool).await.unwrap();
    let second = load_shared_secret(&pool).await.unwrap();

    assert_ne!(first, 0);
    assert_eq!(first, second);
}
