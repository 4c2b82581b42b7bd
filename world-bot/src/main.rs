use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use world_bot::{init_db, load_config, repair_idempotency, run_bot, Cli, Commands, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::InitDb => {
            init_console_tracing();
            let storage = StorageConfig::from_env();
            init_db(&storage.database_url).await?;
            println!("Database ready: {}", storage.database_url);
            Ok(())
        }
        Commands::RepairIdempotency => {
            init_console_tracing();
            let storage = StorageConfig::from_env();
            let deleted = repair_idempotency(&storage.database_url).await?;
            println!("Deleted {} idempotency keys", deleted);
            Ok(())
        }
    }
}

/// Console-only logging for the one-shot maintenance commands.
fn init_console_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}
