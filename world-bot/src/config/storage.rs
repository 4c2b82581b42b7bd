//! Storage-only config for `init-db` / `repair-idempotency`; does not require BOT_TOKEN.

use std::env;

use super::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// DATABASE_URL
    pub database_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self { database_url }
    }
}
