//! Entry points behind the CLI subcommands.

use anyhow::Result;
use std::sync::Arc;
use storage::{AuditDao, AuditRepository};
use tracing::{info, instrument};
use world_core::{init_tracing, Bot};
use world_telegram::{run_repl, TelegramBotAdapter};

use crate::components::{build_bot_components, build_handler_chain, ChainOptions};
use crate::config::BotConfig;

/// Main entry: validate config, init logging, build components and the chain, then run the REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file, &config.log_level)?;

    info!(
        env = %config.env,
        database_url = %config.database_url,
        user_store_path = %config.user_store_path,
        "Initializing bot"
    );

    let components =
        build_bot_components(&config.database_url, &config.user_store_path).await?;
    let teloxide_bot = config.telegram().build_bot()?;
    let reply_bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let handler_chain = build_handler_chain(
        &components,
        reply_bot.clone(),
        ChainOptions {
            enable_echo: !config.is_prod(),
            agent_timeout: config.agent_timeout(),
        },
    );

    info!("Bot started successfully");
    run_repl(teloxide_bot, handler_chain, reply_bot).await
}

/// Creates the audit tables if they do not exist yet.
#[instrument]
pub async fn init_db(database_url: &str) -> Result<()> {
    AuditRepository::new(database_url).await?;
    info!(database_url = %database_url, "Database ready");
    Ok(())
}

/// Deletes every idempotency key and returns how many were removed.
#[instrument]
pub async fn repair_idempotency(database_url: &str) -> Result<u64> {
    let repo = AuditRepository::new(database_url).await?;
    let deleted = repo.clear_idempotency_keys().await?;
    info!(deleted, "Idempotency keys cleared");
    Ok(deleted)
}
