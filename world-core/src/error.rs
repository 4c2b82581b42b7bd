//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error flowing through handlers and the chain.

use thiserror::Error;

/// Top-level error for the bot (database, profile store, transport, config, IO).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Profile store error: {0}")]
    Store(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
