//! Storage layer for the focus tracker.
//!
//! Provides persistence for the session slot and the daily stats history
//! using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. The tracker mutates state from a single task, so a plain owned
//! `Database` is sufficient; wrap it in a `Mutex` if that ever changes.
//!
//! # Schema
//!
//! - `session_slot`: a single-row key/value slot holding today's session
//!   snapshot as JSON. Overwritten in place; it is not a history.
//! - `daily_stats`: one row per calendar day (`YYYY-MM-DD` key) of cumulative
//!   totals, upserted repeatedly while the day is current and immutable once
//!   the day has passed.
//!
//! Timestamps are stored as TEXT in ISO 8601 so lexicographic ordering
//! matches chronological ordering and values stay human-readable.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use ft_core::{DayRecord, SessionSnapshot};

/// Fixed key for the single session slot.
const SESSION_SLOT_KEY: &str = "current";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored date key failed to parse.
    #[error("invalid date key in daily_stats: {value}")]
    DateParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored timestamp failed to parse.
    #[error("invalid timestamp in daily_stats for {date}: {value}")]
    TimestampParse {
        date: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A session snapshot failed to serialize.
    #[error("failed to encode session snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS session_slot (
                key TEXT PRIMARY KEY,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- One row per calendar day; key is 'YYYY-MM-DD'
            CREATE TABLE IF NOT EXISTS daily_stats (
                date TEXT PRIMARY KEY,
                focus_time_ms INTEGER NOT NULL,
                real_time_ms INTEGER NOT NULL,
                productivity_pct REAL NOT NULL,
                session_count INTEGER NOT NULL,
                longest_streak_ms INTEGER NOT NULL,
                away_time_ms INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Reads the session slot, if present and parseable.
    ///
    /// A corrupt blob is treated as absent: it is logged and discarded, and
    /// the caller starts a fresh day. Never an error.
    pub fn read_slot(&self) -> Result<Option<SessionSnapshot>, DbError> {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM session_slot WHERE key = ?",
                [SESSION_SLOT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(blob) = blob else {
            return Ok(None);
        };
        match serde_json::from_str(&blob) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(error) => {
                tracing::warn!(%error, "discarding unparseable session slot");
                Ok(None)
            }
        }
    }

    /// Overwrites the session slot with the given snapshot.
    pub fn write_slot(&self, snapshot: &SessionSnapshot) -> Result<(), DbError> {
        let data = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "
            INSERT INTO session_slot (key, data, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            ",
            params![SESSION_SLOT_KEY, data, format_timestamp(Utc::now())],
        )?;
        Ok(())
    }

    /// Removes the session slot entirely.
    pub fn clear_slot(&self) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM session_slot WHERE key = ?", [SESSION_SLOT_KEY])?;
        Ok(())
    }

    /// Upserts the stats row for the record's date.
    ///
    /// Idempotent: each call overwrites the prior snapshot for that date
    /// rather than summing, since the record carries day-cumulative totals.
    pub fn upsert_day(&self, record: &DayRecord) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO daily_stats
            (date, focus_time_ms, real_time_ms, productivity_pct, session_count, longest_streak_ms, away_time_ms, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                focus_time_ms = excluded.focus_time_ms,
                real_time_ms = excluded.real_time_ms,
                productivity_pct = excluded.productivity_pct,
                session_count = excluded.session_count,
                longest_streak_ms = excluded.longest_streak_ms,
                away_time_ms = excluded.away_time_ms,
                updated_at = excluded.updated_at
            ",
            params![
                format_date(record.date),
                record.focus_time_ms,
                record.real_time_ms,
                record.productivity_pct,
                record.session_count,
                record.longest_streak_ms,
                record.away_time_ms,
                format_timestamp(record.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Returns stats rows with dates in the inclusive range, ascending.
    ///
    /// Days with no activity have no row; callers treat missing days as zero.
    pub fn query_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>, DbError> {
        if end < start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(
            "
            SELECT date, focus_time_ms, real_time_ms, productivity_pct, session_count, longest_streak_ms, away_time_ms, updated_at
            FROM daily_stats
            WHERE date >= ? AND date <= ?
            ORDER BY date ASC
            ",
        )?;
        let rows = stmt.query_map([format_date(start), format_date(end)], |row| {
            Ok(RawDayRow {
                date: row.get(0)?,
                focus_time_ms: row.get(1)?,
                real_time_ms: row.get(2)?,
                productivity_pct: row.get(3)?,
                session_count: row.get(4)?,
                longest_streak_ms: row.get(5)?,
                away_time_ms: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.parse()?);
        }
        Ok(records)
    }

    /// Returns the last `n` days of stats ending at `today`, inclusive.
    pub fn query_last_n_days(&self, n: u32, today: NaiveDate) -> Result<Vec<DayRecord>, DbError> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let start = today - chrono::Duration::days(i64::from(n) - 1);
        self.query_range(start, today)
    }
}

/// A `daily_stats` row before date/timestamp parsing.
struct RawDayRow {
    date: String,
    focus_time_ms: u64,
    real_time_ms: u64,
    productivity_pct: f64,
    session_count: u32,
    longest_streak_ms: u64,
    away_time_ms: u64,
    updated_at: String,
}

impl RawDayRow {
    fn parse(self) -> Result<DayRecord, DbError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|source| {
            DbError::DateParse {
                value: self.date.clone(),
                source,
            }
        })?;
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|source| DbError::TimestampParse {
                date: self.date.clone(),
                value: self.updated_at.clone(),
                source,
            })?
            .with_timezone(&Utc);
        Ok(DayRecord {
            date,
            focus_time_ms: self.focus_time_ms,
            real_time_ms: self.real_time_ms,
            productivity_pct: self.productivity_pct,
            session_count: self.session_count,
            longest_streak_ms: self.longest_streak_ms,
            away_time_ms: self.away_time_ms,
            updated_at,
        })
    }
}

/// Formats a timestamp for storage (ISO 8601, millisecond precision, UTC).
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats a date key for storage (`YYYY-MM-DD`).
fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
