mod db;
mod sync;

use clap::{Parser, Subcommand};
use dharma_core::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::sync::SyncCommands;

#[derive(Debug, Parser)]
#[command(name = "dharma-cli")]
#[command(about = "Dharma Radio catalog sync command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Sync the catalog from Dharma Seed
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = dharma_core::load_app_config()?;
    init_tracing(&config)?;

    let Some(command) = cli.command else {
        println!("dharma-cli: run `dharma-cli --help` for available commands");
        return Ok(());
    };

    let pool_config = dharma_db::PoolConfig::from_app_config(&config);
    let pool = dharma_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => db::run_db(&pool, &command).await,
        Commands::Sync { command } => sync::run_sync(&pool, &config, &command).await,
    }
}

/// Logs go to stderr so stdout carries only the command's JSON report.
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}
