//! Notification copy synthesis.
//!
//! Pure function of the scan result: picks the body template for the
//! boundary classification and fills in 12-hour display times. No failure
//! modes of its own.

use chrono::NaiveDate;
use serde::Serialize;

use crate::scan::{Boundary, WindWindow};

/// Title constant for every high-wind notification.
pub const ALERT_TITLE: &str = "Batten Down the Decorations!";

/// Structured data attached to the notification for the client app.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertData {
    /// JSON-encoded action list, in the shape the sender forwards verbatim.
    pub actions: String,
    pub date: String,
    pub body: String,
    pub start_hour: String,
    pub end_hour: String,
}

/// One notification, produced once per successful alert run and consumed
/// immediately by the external sender.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlertPayload {
    pub title: String,
    pub body: String,
    pub data: AlertData,
}

/// Format an HHMM time-of-day on a 12-hour clock, e.g. 1530 -> "3:30".
///
/// No am/pm suffix; the display consumers render these next to the issue
/// date and don't expect one.
pub fn format_hhmm(time: u32) -> String {
    let hour = time / 100;
    let minute = time % 100;
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02}")
}

/// Build the notification payload for a detected window.
pub fn synthesize(window: &WindWindow, issue_date: NaiveDate) -> AlertPayload {
    let start = format_hhmm(window.start);
    // A single-point gust displays a one-hour span rather than an instant.
    let end = match window.boundary {
        Boundary::SinglePoint => format_hhmm(window.end + 100),
        _ => format_hhmm(window.end),
    };
    let max = window.max_speed;

    let body = match window.boundary {
        Boundary::Continuing => format!(
            "High winds starting at {start} and continuing into tomorrow, with gusts up to {max}mph."
        ),
        Boundary::SinglePoint => format!("High winds of {max}mph expected around {start}."),
        Boundary::Bounded => format!(
            "High winds expected from {start} to {end}, with gusts up to {max}mph."
        ),
    };

    let actions = serde_json::json!([
        {"action": "add-wind-task", "title": "Yes"},
        {"action": "dismiss", "title": "No"}
    ])
    .to_string();

    AlertPayload {
        title: ALERT_TITLE.to_string(),
        body: body.clone(),
        data: AlertData {
            actions,
            date: issue_date.to_string(),
            body,
            start_hour: start,
            end_hour: end,
        },
    }
}
