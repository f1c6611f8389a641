//! The focus state machine: reconciliation point for all three triggers.
//!
//! Manual toggles, debounced presence edges, and Pomodoro phase entries all
//! arrive here and collapse into two idempotent operations, `start_focus` and
//! `pause_focus`. Arbitration is last-writer-wins with no queuing; a trigger
//! asking for the state the engine is already in is a defined no-op, which is
//! what prevents double counting when redundant triggers land in the same
//! tick.
//!
//! Persistence is injected through [`FlushSink`] and is fire-and-forget: sink
//! implementations swallow and log storage failures, and a failed write never
//! rolls back an in-memory transition. Every transition completes before
//! control returns to the caller; there is no await point mid-transition.

use chrono::{DateTime, Utc};

use crate::event::PomodoroPhase;
use crate::presence::PresenceEdge;
use crate::session::{DayRecord, FocusSession, SessionSnapshot};

/// Destination for session snapshots and daily stat records.
///
/// Implementations must be infallible at this boundary: storage errors are
/// logged inside the sink, never surfaced to the state machine.
pub trait FlushSink {
    /// Persists the lightweight session slot.
    fn persist_session(&mut self, snapshot: &SessionSnapshot);

    /// Upserts the day-cumulative stats row.
    fn record_day(&mut self, record: &DayRecord);
}

/// A sink that drops everything. Used when no store is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FlushSink for NullSink {
    fn persist_session(&mut self, _snapshot: &SessionSnapshot) {}
    fn record_day(&mut self, _record: &DayRecord) {}
}

/// Which source requested a transition. Logging only; all triggers are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTrigger {
    Manual,
    Presence,
    Pomodoro,
    Teardown,
}

impl FocusTrigger {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Presence => "presence",
            Self::Pomodoro => "pomodoro",
            Self::Teardown => "teardown",
        }
    }
}

/// Owns the canonical focusing/paused state and drives the accumulator.
#[derive(Debug)]
pub struct FocusEngine<S: FlushSink> {
    session: FocusSession,
    away_time_ms: u64,
    sink: S,
}

impl<S: FlushSink> FocusEngine<S> {
    pub const fn new(session: FocusSession, sink: S) -> Self {
        Self {
            session,
            away_time_ms: 0,
            sink,
        }
    }

    /// Transitions to focusing. Idempotent: a no-op while already focusing.
    ///
    /// Returns whether a transition actually happened.
    pub fn start_focus(&mut self, now: DateTime<Utc>, trigger: FocusTrigger) -> bool {
        self.roll_day_if_needed(now);
        if !self.session.begin_interval(now) {
            tracing::debug!(trigger = trigger.as_str(), "already focusing, ignoring");
            return false;
        }
        tracing::info!(
            trigger = trigger.as_str(),
            session_count = self.session.session_count(),
            "focus started"
        );
        self.sink.persist_session(&self.session.snapshot());
        true
    }

    /// Transitions to paused, crediting the open interval. Idempotent.
    ///
    /// A real transition also flushes the day's stats row, so every committed
    /// interval lands in the historical store.
    pub fn pause_focus(&mut self, now: DateTime<Utc>, trigger: FocusTrigger) -> bool {
        self.roll_day_if_needed(now);
        let Some(credited) = self.session.end_interval(now) else {
            tracing::debug!(trigger = trigger.as_str(), "already paused, ignoring");
            return false;
        };
        tracing::info!(
            trigger = trigger.as_str(),
            credited_ms = credited,
            accumulated_focus_ms = self.session.accumulated_focus_ms(),
            "focus paused"
        );
        self.flush(now);
        true
    }

    /// Manual toggle: unconditional flip.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.session.is_focusing() {
            self.pause_focus(now, FocusTrigger::Manual);
        } else {
            self.start_focus(now, FocusTrigger::Manual);
        }
    }

    /// Applies a debounced presence transition.
    pub fn apply_presence_edge(&mut self, edge: PresenceEdge, now: DateTime<Utc>) {
        match edge {
            PresenceEdge::Away => {
                self.pause_focus(now, FocusTrigger::Presence);
            }
            PresenceEdge::Returned => {
                self.start_focus(now, FocusTrigger::Presence);
            }
        }
    }

    /// Applies a Pomodoro phase entry.
    ///
    /// Entering work auto-starts focus. Entering a break is informational
    /// only: a user may keep focusing straight through a break.
    pub fn apply_phase(&mut self, phase: PomodoroPhase, now: DateTime<Utc>) {
        match phase {
            PomodoroPhase::Work => {
                self.start_focus(now, FocusTrigger::Pomodoro);
            }
            PomodoroPhase::Break => {
                tracing::debug!("break phase entered, focus state unchanged");
            }
        }
    }

    /// Records the classifier's current day-scoped away total.
    ///
    /// The classifier lives outside the engine; the host forwards its total
    /// so flushed day records carry it.
    pub const fn set_away_time(&mut self, away_time_ms: u64) {
        self.away_time_ms = away_time_ms;
    }

    /// Discards all accumulated state for the day.
    ///
    /// The caller is responsible for the confirmation gate; by the time this
    /// runs the decision is final. The open interval, if any, is not credited.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        tracing::info!(
            discarded_focus_ms = self.session.current_focus_ms(now),
            "session reset"
        );
        self.session.reset(now);
        self.away_time_ms = 0;
        self.flush(now);
    }

    /// Persists the session slot and the day's stats row.
    ///
    /// Called on every pause, on the periodic tick, and at teardown.
    pub fn flush(&mut self, now: DateTime<Utc>) {
        self.sink.persist_session(&self.session.snapshot());
        self.sink
            .record_day(&self.session.day_record(now, self.away_time_ms));
    }

    /// Starts a fresh day if the calendar date has moved past the session's.
    ///
    /// An interval open at the boundary is committed to the old day (at the
    /// observation time, since day boundaries are only noticed when an event
    /// or tick arrives) and re-opened in the new day.
    pub fn roll_day_if_needed(&mut self, now: DateTime<Utc>) -> bool {
        if now.date_naive() <= self.session.day_key() {
            return false;
        }
        let was_focusing = self.session.is_focusing();
        self.session.end_interval(now);
        self.flush(now);
        tracing::info!(
            old_day = %self.session.day_key(),
            new_day = %now.date_naive(),
            "day rollover"
        );
        self.session.reset(now);
        self.away_time_ms = 0;
        if was_focusing {
            self.session.begin_interval(now);
            self.sink.persist_session(&self.session.snapshot());
        }
        true
    }

    #[must_use]
    pub const fn is_focusing(&self) -> bool {
        self.session.is_focusing()
    }

    #[must_use]
    pub const fn session(&self) -> &FocusSession {
        &self.session
    }

    #[must_use]
    pub const fn away_time_ms(&self) -> u64 {
        self.away_time_ms
    }
}
