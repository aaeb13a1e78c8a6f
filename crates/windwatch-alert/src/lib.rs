//! Alert decision engine.
//!
//! Scans the stored two-day forecast for a contiguous high-wind window,
//! synthesizes the notification copy, and delivers it once daily on a
//! misfire-tolerant schedule.

pub mod job;
pub mod message;
pub mod notify;
pub mod scan;
pub mod schedule;

pub use job::{AlertJob, ALERT_JOB_NAME};
pub use message::{synthesize, AlertData, AlertPayload, ALERT_TITLE};
pub use notify::{NotifyError, NotifySender};
pub use scan::{scan, Boundary, WindWindow};
