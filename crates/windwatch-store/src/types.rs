//! Domain types persisted by the forecast store.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One audited fetch attempt.
///
/// Records are immutable once created and written append-only, one batch
/// per ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-based position of this attempt within its run.
    pub attempt_number: u32,

    /// When the attempt started, before the network call blocked.
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Whether the attempt produced a usable response.
    pub success: bool,

    /// HTTP status of the response, when one was received.
    pub status_code: Option<u16>,

    /// Short failure description ("timed out", transport message, ...).
    pub error: Option<String>,
}

/// One hourly forecast sample.
///
/// `time` encodes the time of day as HHMM in 100-multiples (900 = 9:00,
/// 1530 = 15:30). Samples within a document are chronologically ascending
/// by `time`; the window scanner depends on that ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourlySample {
    pub time: u32,

    #[serde(rename = "windspeedMiles")]
    pub windspeed_miles: u32,
}

/// The stored forecast for one calendar date.
///
/// Keyed uniquely by `date`; a later write for the same date replaces the
/// document wholesale, with `recorded_at` tracking the last write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastDocument {
    pub date: NaiveDate,
    pub hourly: Vec<HourlySample>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Resolve a date keyword or ISO date string relative to `today`.
///
/// Accepts `today`, `tomorrow`, `yesterday`, or `YYYY-MM-DD`. Returns
/// `None` for anything else, including keyword arithmetic that would leave
/// the calendar range.
pub fn resolve_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d").ok(),
    }
}
