//! # world-telegram
//!
//! Telegram transport layer: adapters, [`world_core::Bot`] implementation with reply keyboards,
//! minimal config, REPL runner and the outer error handler.
//! Handles only Telegram connectivity and handler-chain execution; no persistence or flow logic.

mod adapters;
mod bot_adapter;
mod config;
mod errors;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{to_reply_markup, TelegramBotAdapter};
pub use config::TelegramConfig;
pub use errors::{report_failure, FAILURE_NOTICE};
pub use runner::run_repl;
