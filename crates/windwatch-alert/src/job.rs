//! The daily alert job.
//!
//! Reads today's and tomorrow's stored forecasts, runs the window scanner,
//! and delivers at most one notification attempt per day. A missing
//! document degrades to an empty sample set; a sender failure is logged
//! and left for the next scheduled run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::message::synthesize;
use crate::notify::NotifySender;
use crate::scan::scan;
use crate::schedule::{next_occurrence, should_catch_up};
use windwatch_core::AlertConfig;
use windwatch_store::{ForecastStore, HourlySample};

/// Store key under which alert runs are recorded.
pub const ALERT_JOB_NAME: &str = "daily-alert";

pub struct AlertJob {
    store: Arc<dyn ForecastStore>,
    sender: NotifySender,
    config: AlertConfig,
}

impl AlertJob {
    pub fn new(store: Arc<dyn ForecastStore>, sender: NotifySender, config: AlertConfig) -> Self {
        Self {
            store,
            sender,
            config,
        }
    }

    /// Execute one alert evaluation for the local instant `now`.
    ///
    /// Records the run in the store either way: the next scheduled
    /// occurrence is the retry boundary, never this one.
    pub async fn run_once(&self, now: DateTime<Tz>) {
        let today = now.date_naive();
        let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
            tracing::error!(%today, "No tomorrow on the calendar; skipping run");
            return;
        };
        tracing::info!(%today, %tomorrow, "Running daily wind alert");

        let today_samples = self.samples_for(today);
        let tomorrow_samples = self.samples_for(tomorrow);

        match scan(
            &today_samples,
            &tomorrow_samples,
            self.config.wind_threshold,
            self.config.cutoff_time,
        ) {
            None => {
                tracing::info!("No high winds in the scan range");
            }
            Some(window) => {
                let payload = synthesize(&window, today);
                tracing::info!(
                    boundary = ?window.boundary,
                    max_speed = window.max_speed,
                    body = %payload.body,
                    "High-wind window found"
                );
                if let Err(e) = self.sender.send(&payload).await {
                    // Not retried this run.
                    tracing::error!("Notification delivery failed: {e}");
                }
            }
        }

        if let Err(e) = self.store.record_run(ALERT_JOB_NAME, Utc::now()) {
            tracing::warn!("Failed to record alert run: {e}");
        }
    }

    /// Stored samples for `date`; missing or unreadable documents degrade
    /// to an empty set so the scan still runs on whatever is available.
    fn samples_for(&self, date: NaiveDate) -> Vec<HourlySample> {
        match self.store.forecast_for(date) {
            Ok(Some(doc)) => doc.hourly,
            Ok(None) => {
                tracing::info!(%date, "No stored forecast; treating as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(%date, "Failed to read forecast: {e}; treating as empty");
                Vec::new()
            }
        }
    }

    /// Run forever on the daily schedule, with a single coalesced catch-up
    /// when the most recent occurrence was missed within the grace window.
    pub async fn run_loop(&self) {
        let now = Utc::now().with_timezone(&self.config.timezone);

        let last_run = self.store.last_run(ALERT_JOB_NAME).unwrap_or_else(|e| {
            tracing::warn!("Failed to read last alert run: {e}");
            None
        });
        if should_catch_up(
            last_run,
            now,
            self.config.hour,
            self.config.minute,
            self.config.misfire_grace,
        ) {
            tracing::info!("Missed alert occurrence within grace window; running catch-up");
            self.run_once(now).await;
        }

        loop {
            let now = Utc::now().with_timezone(&self.config.timezone);
            let Some(next) = next_occurrence(now, self.config.hour, self.config.minute) else {
                tracing::error!("Could not compute next alert occurrence; retrying in an hour");
                tokio::time::sleep(Duration::from_secs(3600)).await;
                continue;
            };

            let wait = next
                .signed_duration_since(now)
                .to_std()
                .unwrap_or(Duration::ZERO);
            tracing::info!(next = %next, "Sleeping until next alert run");
            tokio::time::sleep(wait).await;

            let fired_at = Utc::now().with_timezone(&self.config.timezone);
            self.run_once(fired_at).await;
        }
    }
}
