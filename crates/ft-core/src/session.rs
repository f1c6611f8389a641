//! The live focus session and its persisted forms.
//!
//! [`FocusSession`] is the day-scoped mutable state: a day anchor, the
//! duration accumulator, and per-day counters. Everything displayed to the
//! user (elapsed real time, current focus total, productivity percentage) is
//! derived on demand and never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::accumulator::DurationAccumulator;
use crate::clock::ms_between;

/// Live per-day focus state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    day_start: DateTime<Utc>,
    accumulator: DurationAccumulator,
    session_count: u32,
    current_streak_started_at: Option<DateTime<Utc>>,
}

impl FocusSession {
    /// A fresh session anchored at `now` with all counters zeroed.
    #[must_use]
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            day_start: now,
            accumulator: DurationAccumulator::new(),
            session_count: 0,
            current_streak_started_at: None,
        }
    }

    /// Rebuilds a session from persisted counters.
    ///
    /// The restored session is always paused: an open interval is never
    /// trusted across a restore, since wall-clock time while the process was
    /// down cannot be distinguished from genuine focus.
    #[must_use]
    pub const fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            day_start: snapshot.day_start,
            accumulator: DurationAccumulator::from_committed(
                snapshot.accumulated_focus_ms,
                snapshot.longest_streak_ms,
            ),
            session_count: snapshot.session_count,
            current_streak_started_at: None,
        }
    }

    /// Opens a focus interval. Returns `false` if one is already open.
    pub fn begin_interval(&mut self, now: DateTime<Utc>) -> bool {
        if !self.accumulator.start(now) {
            return false;
        }
        self.session_count += 1;
        self.current_streak_started_at = Some(now);
        true
    }

    /// Closes the open focus interval, crediting it.
    ///
    /// Returns the credited milliseconds, or `None` if none was open.
    pub fn end_interval(&mut self, now: DateTime<Utc>) -> Option<u64> {
        let credited = self.accumulator.stop(now)?;
        self.current_streak_started_at = None;
        Some(credited)
    }

    /// Discards all accumulated state and re-anchors the day at `now`.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::fresh(now);
    }

    #[must_use]
    pub const fn is_focusing(&self) -> bool {
        self.accumulator.is_active()
    }

    #[must_use]
    pub const fn day_start(&self) -> DateTime<Utc> {
        self.day_start
    }

    /// Calendar date (UTC) this session belongs to.
    #[must_use]
    pub fn day_key(&self) -> NaiveDate {
        self.day_start.date_naive()
    }

    #[must_use]
    pub const fn session_count(&self) -> u32 {
        self.session_count
    }

    #[must_use]
    pub const fn longest_streak_ms(&self) -> u64 {
        self.accumulator.longest_streak_ms()
    }

    #[must_use]
    pub const fn accumulated_focus_ms(&self) -> u64 {
        self.accumulator.accumulated_ms()
    }

    /// Wall-clock time since the day anchor.
    #[must_use]
    pub fn elapsed_real_ms(&self, now: DateTime<Utc>) -> u64 {
        ms_between(self.day_start, now)
    }

    /// Committed focus time plus the open interval, if any.
    #[must_use]
    pub fn current_focus_ms(&self, now: DateTime<Utc>) -> u64 {
        self.accumulator.current_total(now)
    }

    /// Length of the in-progress focus interval, zero while paused.
    #[must_use]
    pub fn current_streak_ms(&self, now: DateTime<Utc>) -> u64 {
        self.current_streak_started_at
            .map_or(0, |start| ms_between(start, now))
    }

    /// Focus time over elapsed real time as a percentage, capped at 100.
    ///
    /// The cap guards against clock skew making focus exceed real time; an
    /// elapsed time of zero yields 0 rather than a division error.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn productivity_pct(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = self.elapsed_real_ms(now);
        if elapsed == 0 {
            return 0.0;
        }
        let focus = self.current_focus_ms(now).min(elapsed);
        focus as f64 / elapsed as f64 * 100.0
    }

    /// The lightweight persisted form. Never includes the open interval.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            date: self.day_key(),
            day_start: self.day_start,
            accumulated_focus_ms: self.accumulated_focus_ms(),
            session_count: self.session_count,
            longest_streak_ms: self.longest_streak_ms(),
            was_focusing: self.is_focusing(),
        }
    }

    /// The day-cumulative stats row for the historical store.
    #[must_use]
    pub fn day_record(&self, now: DateTime<Utc>, away_time_ms: u64) -> DayRecord {
        DayRecord {
            date: self.day_key(),
            focus_time_ms: self.current_focus_ms(now),
            real_time_ms: self.elapsed_real_ms(now),
            productivity_pct: self.productivity_pct(now),
            session_count: self.session_count,
            longest_streak_ms: self.longest_streak_ms(),
            away_time_ms,
            updated_at: now,
        }
    }
}

/// Single-slot persisted session state.
///
/// `was_focusing` records the state at write time but is deliberately ignored
/// on restore; see [`crate::ledger::restore_session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub date: NaiveDate,
    pub day_start: DateTime<Utc>,
    pub accumulated_focus_ms: u64,
    pub session_count: u32,
    pub longest_streak_ms: u64,
    #[serde(default)]
    pub was_focusing: bool,
}

/// One day's aggregate totals in the historical stats store.
///
/// Each field is day-cumulative, not a delta: repeated upserts for the same
/// date overwrite rather than sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub focus_time_ms: u64,
    pub real_time_ms: u64,
    pub productivity_pct: f64,
    pub session_count: u32,
    pub longest_streak_ms: u64,
    pub away_time_ms: u64,
    pub updated_at: DateTime<Utc>,
}
