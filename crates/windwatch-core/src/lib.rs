pub mod config;

pub use config::{AlertConfig, Config, ConfigError, FetchConfig, NotifyConfig, ValidationResult};

use anyhow::Result;

/// Initialize process-wide logging.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Windwatch core initialized");
    Ok(())
}
