//! Bot configuration: [`BotConfig`] for `run`, [`StorageConfig`] for the maintenance commands.

mod bot_config;
mod storage;


pub use bot_config::BotConfig;
pub use storage::StorageConfig;

/// Default SQLite URL when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/world_bot.db";
