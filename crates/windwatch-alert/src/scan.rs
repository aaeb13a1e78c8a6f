//! Window scanner for the two-day high-wind lookahead.
//!
//! Scans "rest of today" plus "tomorrow until the cutoff" and reports the
//! span of samples meeting the wind threshold, classified by where the
//! span sits relative to the scan's right edge.

use windwatch_store::HourlySample;

/// How the matched span relates to the scan boundary. Drives the wording
/// of the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// The last matched sample is the last sample scanned: the wind holds
    /// through the cutoff into tomorrow.
    Continuing,

    /// The span collapses to one time slot and a later calm sample was
    /// scanned after it.
    SinglePoint,

    /// A proper start-to-end span with calm air after it.
    Bounded,
}

/// A detected high-wind window. Computed fresh on each alert run, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindWindow {
    /// Time of day (HHMM) of the first matched sample.
    pub start: u32,

    /// Time of day of the last matched sample.
    pub end: u32,

    /// Time of day of the last sample examined overall, matched or not.
    pub last_checked: u32,

    /// Peak wind speed over the matched samples.
    pub max_speed: u32,

    /// Matched samples in chronological order.
    pub matched: Vec<HourlySample>,

    pub boundary: Boundary,
}

/// Scan today's and tomorrow's hourly samples for a high-wind window.
///
/// Today contributes samples at or after `cutoff`; tomorrow contributes
/// samples before it, so the lookahead never grows past the same boundary
/// on the next day. Both inputs are assumed chronologically ascending.
/// Returns `None` when no sample meets `threshold`.
///
/// The classification order matters: the right-edge check wins ties, so a
/// one-sample scan whose only sample matches still classifies as
/// `Continuing`. That reproduces the behavior the notification consumers
/// were built against.
pub fn scan(
    today: &[HourlySample],
    tomorrow: &[HourlySample],
    threshold: u32,
    cutoff: u32,
) -> Option<WindWindow> {
    let relevant: Vec<HourlySample> = today
        .iter()
        .filter(|s| s.time >= cutoff)
        .chain(tomorrow.iter().filter(|s| s.time < cutoff))
        .copied()
        .collect();

    let matched: Vec<HourlySample> = relevant
        .iter()
        .filter(|s| s.windspeed_miles >= threshold)
        .copied()
        .collect();

    let start = matched.first()?.time;
    let end = matched.last()?.time;
    let last_checked = relevant.last().map_or(end, |s| s.time);
    let max_speed = matched.iter().map(|s| s.windspeed_miles).max().unwrap_or(0);

    let boundary = if last_checked == end {
        Boundary::Continuing
    } else if start == end {
        Boundary::SinglePoint
    } else {
        Boundary::Bounded
    };

    Some(WindWindow {
        start,
        end,
        last_checked,
        max_speed,
        matched,
        boundary,
    })
}
