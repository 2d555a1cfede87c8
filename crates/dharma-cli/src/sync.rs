//! Sync command handlers for the CLI.
//!
//! Called from `main` after the pool and config are established. The JSON
//! report is printed to stdout. Item-level failures are part of the report;
//! only an aborted run makes the process exit non-zero.

use clap::Subcommand;
use dharma_scraper::DharmaSeedClient;
use dharma_sync::{run_sync_command, PgCatalogStore, SyncCommand, SyncOptions};

#[derive(Debug, Subcommand)]
pub enum SyncCommands {
    /// Crawl the talk listing and ingest talks not yet in the catalog
    Talks {
        /// Report new talks without ingesting them, and crawl every page
        #[arg(long)]
        skip_processing: bool,
        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Upsert every teacher on the teacher list
    Teachers {
        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Teachers, then talks
    All {
        /// Report new talks without ingesting them, and crawl every page
        #[arg(long)]
        skip_processing: bool,
        /// Stop after this many listing pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Refresh stored retreats from their RSS feeds
    Retreats,
}

impl SyncCommands {
    pub(crate) fn command(&self) -> SyncCommand {
        match self {
            Self::Talks { .. } => SyncCommand::Talks,
            Self::Teachers { .. } => SyncCommand::Teachers,
            Self::All { .. } => SyncCommand::All,
            Self::Retreats => SyncCommand::Retreats,
        }
    }

    pub(crate) fn options(&self, base: SyncOptions) -> SyncOptions {
        match *self {
            Self::Talks {
                skip_processing,
                max_pages,
            }
            | Self::All {
                skip_processing,
                max_pages,
            } => base
                .with_skip_processing(skip_processing)
                .with_max_pages(max_pages),
            Self::Teachers { max_pages } => base.with_max_pages(max_pages),
            Self::Retreats => base,
        }
    }
}

/// Runs one sync command against the live site and database.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the report cannot be
/// serialized, or any sub-command aborted.
pub(crate) async fn run_sync(
    pool: &sqlx::PgPool,
    config: &dharma_core::AppConfig,
    command: &SyncCommands,
) -> anyhow::Result<()> {
    let client = DharmaSeedClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Dharma Seed client: {e}"))?;
    let store = PgCatalogStore::new(pool.clone());
    let options = command.options(SyncOptions::from_app_config(config));

    let report = run_sync_command(command.command(), &client, &store, &options).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.success {
        anyhow::bail!("sync {} aborted; see the report for details", report.command);
    }
    Ok(())
}
