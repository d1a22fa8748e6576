//! Quake relay service.
//!
//! Streams earthquake alerts from the configured feeds and posts bulletins.

use publisher::{LoggingClient, Publisher, XClient, XConfig};
use quake_feed::WsConnector;
use quake_relay::{health, RelayConfig, Supervisor};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env()?;
    info!(version = quake_relay::version(), ?config, "Starting quake relay");

    let publisher = match config.x_credentials.clone() {
        Some(credentials) if !config.dry_run => Publisher::new(XClient::new(
            XConfig::new(credentials).with_api_url(&config.x_api_url),
        )?),
        _ => {
            warn!("DRY_RUN set, bulletins will be logged instead of posted");
            Publisher::new(LoggingClient)
        }
    };

    let supervisor = Supervisor::for_feeds(config.feeds(), WsConnector, &publisher);
    info!(feeds = ?supervisor.feeds(), "Feeds started");

    health::spawn(config.addr);
    supervisor.run_until(shutdown_signal()).await;
    info!("Quake relay stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
