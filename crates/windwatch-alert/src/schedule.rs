//! Daily occurrence math for the alert schedule.
//!
//! The job fires once a day at a fixed wall-clock time in the serving
//! region's timezone. These are the pure pieces: finding the neighboring
//! occurrences of that wall-clock time around "now", and deciding whether
//! a missed occurrence should trigger a single coalesced catch-up run.

use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The scheduled occurrence on `date`, if that wall-clock time exists
/// there (a DST spring-forward gap can swallow it).
fn occurrence_on(date: NaiveDate, hour: u32, minute: u32, tz: Tz) -> Option<DateTime<Tz>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// Most recent scheduled occurrence at or before `now`.
pub fn previous_occurrence(now: DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    // Step back past at most one DST gap.
    for _ in 0..3 {
        if let Some(occurrence) = occurrence_on(date, hour, minute, tz) {
            if occurrence <= now {
                return Some(occurrence);
            }
        }
        date = date.checked_sub_days(Days::new(1))?;
    }
    None
}

/// First scheduled occurrence strictly after `now`.
pub fn next_occurrence(now: DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    for _ in 0..3 {
        if let Some(occurrence) = occurrence_on(date, hour, minute, tz) {
            if occurrence > now {
                return Some(occurrence);
            }
        }
        date = date.checked_add_days(Days::new(1))?;
    }
    None
}

/// Whether a missed occurrence warrants one immediate catch-up run.
///
/// True when the most recent occurrence has not been run yet (or no run
/// was ever recorded) and it is still within the grace window. Only the
/// single most recent occurrence is considered, so multiple missed days
/// coalesce into one catch-up.
pub fn should_catch_up(
    last_run: Option<DateTime<Utc>>,
    now: DateTime<Tz>,
    hour: u32,
    minute: u32,
    grace: Duration,
) -> bool {
    let Some(occurrence) = previous_occurrence(now, hour, minute) else {
        return false;
    };

    let age = now.signed_duration_since(occurrence);
    if age.to_std().map_or(true, |d| d > grace) {
        return false;
    }

    match last_run {
        None => true,
        Some(last) => last < occurrence.with_timezone(&Utc),
    }
}
