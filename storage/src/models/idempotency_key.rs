//! Idempotency key model.
//!
//! Maps to the `idempotency_keys` table. A row exists for every logical operation that has been
//! claimed; rows are never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IdempotencyKey {
    pub id: i64,
    pub key: String,
    pub created_at: DateTime<Utc>,
}
