//! Forecast store trait and error types.
//!
//! The `ForecastStore` trait is the seam between persistence and the two
//! orchestrators: the ingestion job writes through it and the alert job
//! reads through it. Implementations must be shareable across tasks; the
//! SQLite implementation handles this internally with a mutex.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::types::{AttemptRecord, ForecastDocument, HourlySample};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or reached.
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// A write failed.
    #[error("Write failed for {context}: {message}")]
    Write { context: String, message: String },

    /// A read failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Stored content could not be decoded.
    #[error("Corrupt stored document: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn write(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Write {
            context: context.into(),
            message: message.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Date-keyed forecast persistence.
pub trait ForecastStore: Send + Sync {
    /// Replace-or-create the forecast document for `date`.
    ///
    /// Re-running the same `(date, hourly)` write is a no-op overwrite,
    /// not a duplicate; `recorded_at` always reflects the latest write.
    fn upsert_forecast(&self, date: NaiveDate, hourly: &[HourlySample]) -> StoreResult<()>;

    /// Append one ingestion run's attempt batch.
    fn insert_attempts(&self, attempts: &[AttemptRecord]) -> StoreResult<()>;

    /// Fetch the stored document for `date`, if any.
    fn forecast_for(&self, date: NaiveDate) -> StoreResult<Option<ForecastDocument>>;

    /// Most recent attempt records, newest first, at most `limit`.
    fn recent_attempts(&self, limit: u32) -> StoreResult<Vec<AttemptRecord>>;

    /// Timestamp of the last completed run of the named job, if any.
    fn last_run(&self, job: &str) -> StoreResult<Option<DateTime<Utc>>>;

    /// Record a completed run of the named job.
    fn record_run(&self, job: &str, at: DateTime<Utc>) -> StoreResult<()>;
}
