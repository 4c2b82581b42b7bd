use crate::error::StorageError;
use async_trait::async_trait;

/// Narrow data-access contract used by flows: claim a key, append an event, bulk-clear keys.
#[async_trait]
pub trait AuditDao: Send + Sync {
    /// Claims `key`. `Ok(true)` for the first and only caller, `Ok(false)` once the key is taken.
    /// Any other storage failure is an `Err`, never `Ok(false)`.
    async fn try_acquire_idempotency(&self, key: &str) -> Result<bool, StorageError>;

    /// Appends one audit event.
    async fn log_event(
        &self,
        user_id: i64,
        event: &str,
        payload: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Deletes every idempotency key and returns how many were removed. Maintenance only.
    async fn clear_idempotency_keys(&self) -> Result<u64, StorageError>;
}
