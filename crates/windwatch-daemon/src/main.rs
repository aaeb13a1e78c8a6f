//! windwatchd: the windwatch daemon.
//!
//! Wires the ingestion and alert subsystems to one shared forecast store
//! and runs both schedulers on the tokio runtime. The store is opened
//! once at startup; failure to open it is fatal, since ingestion must not
//! proceed without persistence.

use std::sync::Arc;

use anyhow::{Context, Result};

use windwatch_alert::{AlertJob, NotifySender};
use windwatch_core::Config;
use windwatch_ingest::{ForecastClient, IngestJob, RetryPolicy};
use windwatch_store::{ForecastStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    windwatch_core::init()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        url = %config.weather_url,
        db = %config.db_path.display(),
        "Starting windwatchd"
    );

    let store: Arc<dyn ForecastStore> = Arc::new(
        SqliteStore::open(&config.db_path).context("Failed to open forecast store")?,
    );

    let client = ForecastClient::new(
        config.weather_url.clone(),
        config.fetch.request_timeout,
        RetryPolicy {
            max_attempts: config.fetch.max_attempts,
            retry_delay: config.fetch.retry_delay,
        },
    )
    .context("Failed to build forecast client")?;
    let ingest = IngestJob::new(client, store.clone(), config.fetch.interval);

    let sender = NotifySender::new(config.notify.endpoint.clone(), config.notify.user_id.clone())
        .context("Failed to build notification sender")?;
    let alert = AlertJob::new(store, sender, config.alert.clone());

    let ingest_task = tokio::spawn(async move { ingest.run_loop().await });
    let alert_task = tokio::spawn(async move { alert.run_loop().await });

    // Both loops run forever; reaching here means one panicked.
    let (ingest_result, alert_result) = tokio::join!(ingest_task, alert_task);
    ingest_result.context("Ingestion task failed")?;
    alert_result.context("Alert task failed")?;

    Ok(())
}
