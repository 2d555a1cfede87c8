mod api;
mod middleware;
mod runner;
mod scheduler;

use std::sync::Arc;

use dharma_core::{AppConfig, LogFormat};
use dharma_scraper::DharmaSeedClient;
use dharma_sync::{PgCatalogStore, SyncOptions};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
    runner::SyncRunner,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dharma_core::load_app_config()?;
    init_tracing(&config)?;

    let pool_config = dharma_db::PoolConfig::from_app_config(&config);
    let pool = dharma_db::connect_pool(&config.database_url, pool_config).await?;
    dharma_db::run_migrations(&pool).await?;

    let client = DharmaSeedClient::from_app_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build Dharma Seed client: {e}"))?;
    let runner = SyncRunner::new(
        Arc::new(client),
        Arc::new(PgCatalogStore::new(pool.clone())),
        SyncOptions::from_app_config(&config),
    );

    let _scheduler =
        scheduler::build_scheduler(runner.clone(), config.sync_schedule.as_deref()).await?;

    let auth = AuthState::from_env(matches!(config.env, dharma_core::Environment::Development))?;
    let app = build_app(AppState { pool, runner }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
