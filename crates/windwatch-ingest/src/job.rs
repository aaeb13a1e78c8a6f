//! The hourly ingestion job.
//!
//! One run is strictly sequential: fetch, record the attempt batch, then
//! upsert each per-date entry independently. An attempt-log write failure
//! is swallowed (logged) so it can never block forecast persistence, and a
//! failure on one date never blocks its siblings.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::client::ForecastClient;
use crate::upstream::decode_day;
use windwatch_store::ForecastStore;

pub struct IngestJob {
    client: ForecastClient,
    store: Arc<dyn ForecastStore>,
    interval: Duration,
}

impl IngestJob {
    pub fn new(client: ForecastClient, store: Arc<dyn ForecastStore>, interval: Duration) -> Self {
        Self {
            client,
            store,
            interval,
        }
    }

    /// Execute one ingestion run.
    pub async fn run_once(&self) {
        let (payload, attempts) = self.client.fetch().await;

        // Non-fatal: the forecast upserts below proceed regardless.
        match self.store.insert_attempts(&attempts) {
            Ok(()) => tracing::info!(count = attempts.len(), "Recorded attempt batch"),
            Err(e) => tracing::warn!("Failed to record attempt batch: {e}"),
        }

        let Some(payload) = payload else {
            tracing::warn!("No forecast fetched this run; skipping forecast persistence");
            return;
        };

        for day in &payload.weather {
            match decode_day(day) {
                Ok((date, hourly)) => match self.store.upsert_forecast(date, &hourly) {
                    Ok(()) => {
                        tracing::info!(%date, samples = hourly.len(), "Upserted forecast");
                    }
                    Err(e) => {
                        tracing::error!(%date, "Failed to persist forecast: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!(date = %day.date, "Skipping per-date entry: {e}");
                }
            }
        }
    }

    /// Run forever on a fixed-rate interval.
    ///
    /// The first tick fires immediately, giving the eager startup run;
    /// missed ticks are skipped rather than queued.
    pub async fn run_loop(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.run_once().await;
        }
    }
}
