use anyhow::{Context, Result};
use dynweather_core::Config;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = Config::load().context("Failed to load configuration")?;
    let config = loaded.config;
    dynweather_core::init_logging(&config.logging.filter)?;

    if loaded.created {
        tracing::info!("No config at {}, wrote defaults", loaded.path.display());
    } else {
        tracing::debug!("Using config at {}", loaded.path.display());
    }

    if let Err(e) = config.ensure_valid() {
        tracing::error!("{}", e.user_message());
        return Err(e.into());
    }

    tracing::info!(
        "dynweather relay started (timeout {} ms)",
        config.relay.request_timeout_ms
    );

    // Frontend notifications arrive on stdin and leave on stdout, one JSON object per line.
    let stats = dynweather_relay::run_bridge(
        &config.relay,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    tracing::info!(
        "Frontend closed: {} requests, {} notifications, {} rejected",
        stats.requests,
        stats.notifications,
        stats.rejected
    );

    Ok(())
}
