//! Date-keyed forecast storage for windwatch.
//!
//! Defines the domain types shared by the ingestion and alert subsystems,
//! the `ForecastStore` trait both sides talk to, and the SQLite-backed
//! implementation used in production.

pub mod sqlite;
pub mod store;
pub mod types;

pub use sqlite::SqliteStore;
pub use store::{ForecastStore, StoreError, StoreResult};
pub use types::{resolve_date, AttemptRecord, ForecastDocument, HourlySample};
