//! Forecast ingestion pipeline.
//!
//! Fetches the upstream forecast with bounded retry, audits every attempt,
//! and upserts one document per calendar date into the forecast store.

pub mod client;
pub mod job;
pub mod upstream;

pub use client::{ForecastClient, RetryPolicy};
pub use job::IngestJob;
pub use upstream::{decode_day, ParseError, UpstreamDay, UpstreamHour, UpstreamPayload};
