use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::database::{ACQUIRE_TIMEOUT_SECS, IDLE_TIMEOUT_SECS, STATEMENT_TIMEOUT};

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryMeasureStore;
pub use postgres::PgMeasureStore;
pub use repository::{CreateOutcome, MeasureStore};

pub type DatabasePool = Pool<Postgres>;

pub async fn setup_database(config: &Config) -> Result<DatabasePool> {
    info!("Connecting to database");

    if !config.database_url.contains("sslmode=") && config.is_production() {
        warn!("Database connection does not enforce SSL. Consider adding sslmode=require to connection string");
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .idle_timeout(Duration::from_secs(IDLE_TIMEOUT_SECS))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("SET timezone = 'UTC'").execute(&mut *conn).await?;
                sqlx::query(&format!("SET statement_timeout = '{}'", STATEMENT_TIMEOUT))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await?;

    let start_time = std::time::Instant::now();
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!(
        max_connections = config.max_connections,
        "Database connection established in {:?}",
        start_time.elapsed()
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &DatabasePool) -> Result<()> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
