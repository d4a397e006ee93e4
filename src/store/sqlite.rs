//! Local SQLite record store
//!
//! The alternate backend for deployments without remote-store credentials.
//! Session ids come from an AUTOINCREMENT table; the upsert rides on the
//! (session_identifier, eval_id) primary key.

use std::path::Path;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{EvaluationRecord, RecordStore};
use crate::{Error, Result};

const CREATE_EVALUATIONS: &str = "
CREATE TABLE IF NOT EXISTS evaluations (
    session_identifier INTEGER NOT NULL,
    eval_id            TEXT NOT NULL,
    item_class         TEXT NOT NULL,
    item_metric        TEXT NOT NULL,
    item_case          TEXT NOT NULL,
    comparative_rating TEXT NOT NULL,
    test_rating        INTEGER NOT NULL,
    comparison_rating  INTEGER NOT NULL,
    comments           TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (session_identifier, eval_id)
)";

const CREATE_SESSIONS: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    issued_at TEXT NOT NULL DEFAULT (datetime('now'))
)";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if necessary) the database and ensure the schema.
    pub async fn connect(path: &Path) -> Result<Self> {
        let db_url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(|e| Error::Config(format!("Failed to open {}: {}", path.display(), e)))?;

        sqlx::query(CREATE_EVALUATIONS).execute(&pool).await?;
        sqlx::query(CREATE_SESSIONS).execute(&pool).await?;

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn issue_session_id(&self) -> Result<i64> {
        let result = sqlx::query("INSERT INTO sessions DEFAULT VALUES")
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn upsert_record(&self, record: &EvaluationRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO evaluations (
                session_identifier, eval_id, item_class, item_metric, item_case,
                comparative_rating, test_rating, comparison_rating, comments
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(session_identifier, eval_id) DO UPDATE SET
                comparative_rating = excluded.comparative_rating,
                test_rating        = excluded.test_rating,
                comparison_rating  = excluded.comparison_rating,
                comments           = excluded.comments",
        )
        .bind(record.session_identifier)
        .bind(&record.eval_id)
        .bind(&record.item_class)
        .bind(&record.item_metric)
        .bind(&record.item_case)
        .bind(&record.comparative_rating)
        .bind(record.test_rating)
        .bind(record.comparison_rating)
        .bind(&record.comments)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record(session: i64, eval_id: &str) -> EvaluationRecord {
        EvaluationRecord {
            session_identifier: session,
            eval_id: eval_id.to_string(),
            item_class: "Copra Cake".to_string(),
            item_metric: "AHIQ".to_string(),
            item_case: "case1".to_string(),
            comparative_rating: "test".to_string(),
            test_rating: 4,
            comparison_rating: 3,
            comments: String::new(),
        }
    }

    async fn test_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::connect(&dir.path().join("qualeval.db"))
            .await
            .expect("open test database");
        (dir, store)
    }

    #[tokio::test]
    async fn session_ids_are_sequential() {
        let (_dir, store) = test_store().await;
        let first = store.issue_session_id().await.unwrap();
        let second = store.issue_session_id().await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn upsert_is_last_write_wins() {
        let (_dir, store) = test_store().await;

        let mut record = sample_record(7, "CC-AHIQ-case1");
        store.upsert_record(&record).await.unwrap();

        record.test_rating = 5;
        record.comparison_rating = 1;
        record.comments = "revised".to_string();
        store.upsert_record(&record).await.unwrap();

        let (count, test_rating, comments): (i64, i64, String) = sqlx::query_as(
            "SELECT COUNT(*), MAX(test_rating), MAX(comments) FROM evaluations
             WHERE session_identifier = 7 AND eval_id = 'CC-AHIQ-case1'",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();

        assert_eq!(count, 1);
        assert_eq!(test_rating, 5);
        assert_eq!(comments, "revised");
    }

    #[tokio::test]
    async fn distinct_keys_insert_distinct_rows() {
        let (_dir, store) = test_store().await;

        store.upsert_record(&sample_record(7, "CC-AHIQ-case1")).await.unwrap();
        store.upsert_record(&sample_record(7, "RB-SSIM-case2")).await.unwrap();
        store.upsert_record(&sample_record(8, "CC-AHIQ-case1")).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM evaluations")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 3);
    }
}
