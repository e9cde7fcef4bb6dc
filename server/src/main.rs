//! FXBoard Server Binary
//!
//! Serves merged bank exchange rates over HTTP.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxboard_server::{RateServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting FXBoard rate server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        fallback_url = %config.fallback.base_url,
        scrape_timeout_secs = config.scrape.timeout.as_secs(),
        "Configuration loaded"
    );

    let server = RateServer::new(config)?;
    server.run().await?;

    info!("FXBoard shutdown complete");
    Ok(())
}
