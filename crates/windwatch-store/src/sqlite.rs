//! SQLite-backed forecast store.
//!
//! One row per calendar date in `forecasts`, the hourly series as a JSON
//! column, so the upsert access pattern of a document store maps onto a
//! single-row `INSERT .. ON CONFLICT`. Attempts are append-only. A mutex
//! around the connection lets one store handle be shared by the ingestion
//! and alert tasks.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::store::{ForecastStore, StoreError, StoreResult};
use crate::types::{AttemptRecord, ForecastDocument, HourlySample};

/// SQLite-backed forecast storage.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path.
    ///
    /// # Errors
    /// Returns `StoreError::Connection` if the database cannot be opened
    /// or the schema cannot be initialized. Callers on the ingestion path
    /// treat this as fatal.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store
            .init_schema()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store
            .init_schema()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS forecasts (
                date TEXT PRIMARY KEY,
                hourly TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                attempt_number INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                success INTEGER NOT NULL,
                status_code INTEGER,
                error TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_attempts_timestamp ON attempts(timestamp DESC);

            CREATE TABLE IF NOT EXISTS job_runs (
                job TEXT PRIMARY KEY,
                last_run TEXT NOT NULL
            );
            "#,
        )
    }

    fn parse_utc(raw: &str) -> StoreResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt(format!("bad timestamp {raw:?}: {e}")))
    }
}

impl ForecastStore for SqliteStore {
    fn upsert_forecast(&self, date: NaiveDate, hourly: &[HourlySample]) -> StoreResult<()> {
        let hourly_json = serde_json::to_string(hourly)
            .map_err(|e| StoreError::write(format!("forecast {date}"), e))?;
        let recorded_at = Utc::now().to_rfc3339();

        self.conn
            .lock()
            .execute(
                r#"
                INSERT INTO forecasts (date, hourly, recorded_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(date) DO UPDATE SET
                    hourly = excluded.hourly,
                    recorded_at = excluded.recorded_at
                "#,
                params![date.to_string(), hourly_json, recorded_at],
            )
            .map_err(|e| StoreError::write(format!("forecast {date}"), e))?;
        Ok(())
    }

    fn insert_attempts(&self, attempts: &[AttemptRecord]) -> StoreResult<()> {
        if attempts.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::write("attempt batch", e))?;
        for attempt in attempts {
            tx.execute(
                r#"
                INSERT INTO attempts (attempt_number, timestamp, success, status_code, error)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    attempt.attempt_number,
                    attempt.timestamp.to_rfc3339(),
                    attempt.success,
                    attempt.status_code,
                    attempt.error,
                ],
            )
            .map_err(|e| StoreError::write("attempt batch", e))?;
        }
        tx.commit().map_err(|e| StoreError::write("attempt batch", e))
    }

    fn forecast_for(&self, date: NaiveDate) -> StoreResult<Option<ForecastDocument>> {
        let row: Option<(String, String)> = self
            .conn
            .lock()
            .query_row(
                "SELECT hourly, recorded_at FROM forecasts WHERE date = ?1",
                params![date.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((hourly_json, recorded_at)) = row else {
            return Ok(None);
        };

        let hourly: Vec<HourlySample> = serde_json::from_str(&hourly_json)
            .map_err(|e| StoreError::Corrupt(format!("hourly for {date}: {e}")))?;

        Ok(Some(ForecastDocument {
            date,
            hourly,
            recorded_at: Self::parse_utc(&recorded_at)?,
        }))
    }

    fn recent_attempts(&self, limit: u32) -> StoreResult<Vec<AttemptRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT attempt_number, timestamp, success, status_code, error
            FROM attempts
            ORDER BY timestamp DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<u16>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut attempts = Vec::new();
        for row in rows {
            let (attempt_number, timestamp, success, status_code, error) = row?;
            attempts.push(AttemptRecord {
                attempt_number,
                timestamp: Self::parse_utc(&timestamp)?,
                success,
                status_code,
                error,
            });
        }
        Ok(attempts)
    }

    fn last_run(&self, job: &str) -> StoreResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = self
            .conn
            .lock()
            .query_row(
                "SELECT last_run FROM job_runs WHERE job = ?1",
                params![job],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|r| Self::parse_utc(&r)).transpose()
    }

    fn record_run(&self, job: &str, at: DateTime<Utc>) -> StoreResult<()> {
        self.conn
            .lock()
            .execute(
                r#"
                INSERT INTO job_runs (job, last_run) VALUES (?1, ?2)
                ON CONFLICT(job) DO UPDATE SET last_run = excluded.last_run
                "#,
                params![job, at.to_rfc3339()],
            )
            .map_err(|e| StoreError::write(format!("job run {job}"), e))?;
        Ok(())
    }
}
