//! CLI definitions (clap derive).

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "world-bot")]
#[command(about = "Telegram onboarding bot: run, init-db, repair-idempotency", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Create the database tables if missing (DATABASE_URL from env).
    InitDb,
    /// Delete every idempotency key so past submissions can be replayed.
    RepairIdempotency,
}
