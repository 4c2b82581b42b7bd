//! Audit event model.
//!
//! Maps to the append-only `event_logs` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventLog {
    pub id: i64,
    pub user_id: i64,
    pub event: String,
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}
