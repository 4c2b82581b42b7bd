//! # world-bot
//!
//! Application crate: loads config from env, opens the stores, wires the handler chain
//! (logging → onboarding flow → /help → /echo) and runs the Telegram REPL.

pub mod cli;
pub mod components;
pub mod config;
pub mod flows;
pub mod handlers;
pub mod runner;

pub use cli::{Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents, ChainOptions};
pub use config::{BotConfig, StorageConfig};
pub use flows::{Mode, OnboardingFlow, OnboardingState};
pub use handlers::{EchoHandler, HelpHandler, LoggingHandler};
pub use runner::{init_db, repair_idempotency, run_bot};

/// Loads [`BotConfig`] from env; `token` overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> anyhow::Result<BotConfig> {
    BotConfig::load(token)
}
