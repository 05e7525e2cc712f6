//! Application startup and initialization logic.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat};
use crate::database::{self, InMemoryMeasureStore, PgMeasureStore};

const DEFAULT_LOG_FILTER: &str = "meter_reading_api=debug,tower_http=debug";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = installed {
        eprintln!("Tracing subscriber already installed: {}", e);
    }
}

/// Build the store selected by `config` and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    if config.uses_in_memory_store() {
        warn!("DATABASE_URL not set, using the in-memory store; data is lost on shutdown");
        return Ok(AppState::new(config.clone(), Arc::new(InMemoryMeasureStore::new())));
    }

    let db_pool = database::setup_database(config).await?;
    info!("✅ PostgreSQL connection established");

    database::run_migrations(&db_pool).await?;
    info!("✅ Database migrations completed");

    let store = Arc::new(PgMeasureStore::new(db_pool));
    Ok(AppState::new(config.clone(), store))
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
