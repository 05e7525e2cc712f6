use std::net::SocketAddr;

use anyhow::Result;
use tracing::info;

use meter_reading_api::{router, startup, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    startup::init_tracing(config.log_format);
    info!("Loaded configuration for environment: {}", config.environment);

    let app_state = startup::initialize_app(&config).await?;
    let app = router::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Meter reading API listening on {}", addr);
    info!("API documentation available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal())
        .await?;

    Ok(())
}
