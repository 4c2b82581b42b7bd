//! Runtime config for the bot: Telegram connection, environment, logging, storage paths, agent bound.
//! Loaded from env (after `dotenvy::dotenv()` in main).

use anyhow::Result;
use std::env;
use std::time::Duration;
use tracing::warn;
use world_telegram::TelegramConfig;

use super::DEFAULT_DATABASE_URL;

/// Environment name that disables developer-only commands.
const PROD_ENV: &str = "prod";
const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN (trimmed)
    pub bot_token: String,
    /// ENV; `/echo` is only registered outside `prod`
    pub env: String,
    /// LOG_LEVEL; default filter when RUST_LOG is unset
    pub log_level: String,
    /// LOG_FILE
    pub log_file: String,
    /// DATABASE_URL (sqlite URL or plain file path)
    pub database_url: String,
    /// USER_STORE_PATH
    pub user_store_path: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// AGENT_TIMEOUT_SECS
    pub agent_timeout_secs: u64,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        }
        .trim()
        .to_string();
        if bot_token.is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }

        let env_name = env::var("ENV")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "dev".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/world-bot.log".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let user_store_path =
            env::var("USER_STORE_PATH").unwrap_or_else(|_| "data/users.json".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let agent_timeout_secs = match env::var("AGENT_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid AGENT_TIMEOUT_SECS, using {}", DEFAULT_AGENT_TIMEOUT_SECS);
                DEFAULT_AGENT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_AGENT_TIMEOUT_SECS,
        };

        Ok(Self {
            bot_token,
            env: env_name,
            log_level,
            log_file,
            database_url,
            user_store_path,
            telegram_api_url,
            agent_timeout_secs,
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set; the agent bound must be non-zero).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.agent_timeout_secs == 0 {
            anyhow::bail!("AGENT_TIMEOUT_SECS must be greater than 0");
        }
        Ok(())
    }

    pub fn is_prod(&self) -> bool {
        self.env.eq_ignore_ascii_case(PROD_ENV)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    /// Telegram part of the config, for building the teloxide bot.
    pub fn telegram(&self) -> TelegramConfig {
        TelegramConfig {
            bot_token: self.bot_token.clone(),
            api_url: self.telegram_api_url.clone(),
        }
    }
}
