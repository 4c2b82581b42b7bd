//! Storage error types.
//!
//! A unique-key conflict on the idempotency ledger is not an error; it is reported as `Ok(false)`
//! by [`crate::AuditDao::try_acquire_idempotency`]. Everything else surfaces here.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Invalid database url: {0}")]
    InvalidUrl(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}
