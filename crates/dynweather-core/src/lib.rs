pub mod config;
pub mod error;

pub use config::{Config, LoadedConfig, LoggingConfig, RelayConfig, ValidationResult};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Output goes to stderr
/// because stdout is reserved for frontend notifications.
pub fn init_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("Logging initialized");
    Ok(())
}
