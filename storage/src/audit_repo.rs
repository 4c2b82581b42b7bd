//! Audit repository: idempotency ledger and event log.
//!
//! Uses SqlitePoolManager and the models (IdempotencyKey, EventLog). The `UNIQUE` constraint on
//! `idempotency_keys.key` is the only thing that decides who wins a key; there is no in-process lock,
//! so several bot instances may share one database file.

use crate::error::StorageError;
use crate::models::{EventLog, IdempotencyKey};
use crate::repository::AuditDao;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct AuditRepository {
    pool_manager: SqlitePoolManager,
}

impl AuditRepository {
    /// Opens (or creates) the database and makes sure the tables exist.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        Self::with_pool(pool_manager).await
    }

    /// Builds a repository on an existing pool and creates the tables if needed.
    pub async fn with_pool(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS idempotency_keys (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                "key" TEXT NOT NULL CHECK (length("key") <= 128),
                created_at TEXT NOT NULL,
                CONSTRAINT uq_idem_key UNIQUE ("key")
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS event_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                event TEXT NOT NULL CHECK (length(event) <= 64),
                payload TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_event_logs_user_time ON event_logs(user_id, created_at)",
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Looks up a claimed key.
    pub async fn get_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<IdempotencyKey>, StorageError> {
        let row = sqlx::query_as::<_, IdempotencyKey>(
            r#"SELECT id, "key", created_at FROM idempotency_keys WHERE "key" = ?"#,
        )
        .bind(key)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(row)
    }

    /// Most recent events of one user, newest first.
    pub async fn recent_events(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<EventLog>, StorageError> {
        let events = sqlx::query_as::<_, EventLog>(
            r#"
            SELECT id, user_id, event, payload, created_at
            FROM event_logs
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;

        debug!(user_id, count = events.len(), "Retrieved recent events");
        Ok(events)
    }
}

#[async_trait]
impl AuditDao for AuditRepository {
    #[instrument(skip(self))]
    async fn try_acquire_idempotency(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(r#"INSERT INTO idempotency_keys ("key", created_at) VALUES (?, ?)"#)
            .bind(key)
            .bind(Utc::now())
            .execute(self.pool_manager.pool())
            .await;

        match result {
            Ok(_) => {
                info!(key = %key, "Idempotency key acquired");
                Ok(true)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                info!(key = %key, "Idempotency key already claimed");
                Ok(false)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to acquire idempotency key");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, payload))]
    async fn log_event(
        &self,
        user_id: i64,
        event: &str,
        payload: Option<&str>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO event_logs (user_id, event, payload, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(event)
        .bind(payload)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        info!(user_id, event = %event, "Logged event");
        Ok(())
    }

    async fn clear_idempotency_keys(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM idempotency_keys")
            .execute(self.pool_manager.pool())
            .await?;

        info!(deleted = result.rows_affected(), "Cleared idempotency keys");
        Ok(result.rows_affected())
    }
}
