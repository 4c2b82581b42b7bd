//! Short-lived conversation sessions.
//!
//! Meant for flows only (e.g. the onboarding choice between steps), not for long-term agent memory.
//! Nothing is persisted: a restart drops every in-flight session.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Transient state of one user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub user_id: i64,
    pub data: HashMap<String, Value>,
}

impl Session {
    fn new(user_id: i64) -> Self {
        Self {
            user_id,
            data: HashMap::new(),
        }
    }
}

/// In-memory session store keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<i64, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the user's session, creating an empty one on first access.
    pub async fn get(&self, user_id: i64) -> Session {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id))
            .clone()
    }

    /// Drops the user's session. No-op when there is none.
    pub async fn clear(&self, user_id: i64) {
        if self.sessions.write().await.remove(&user_id).is_some() {
            debug!(user_id, "Session cleared");
        }
    }

    pub async fn set_value(&self, user_id: i64, key: &str, value: impl Into<Value>) {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id))
            .data
            .insert(key.to_string(), value.into());
    }

    /// Value stored under `key`, or `None` when it was never set (or the session was cleared).
    pub async fn get_value(&self, user_id: i64, key: &str) -> Option<Value> {
        self.sessions
            .read()
            .await
            .get(&user_id)
            .and_then(|s| s.data.get(key).cloned())
    }

    /// Like [`get_value`](Self::get_value) but falls back to `default`.
    pub async fn get_value_or(&self, user_id: i64, key: &str, default: Value) -> Value {
        self.get_value(user_id, key).await.unwrap_or(default)
    }

    /// True when a session exists for the user (even an empty one).
    pub async fn contains(&self, user_id: i64) -> bool {
        self.sessions.read().await.contains_key(&user_id)
    }
}
