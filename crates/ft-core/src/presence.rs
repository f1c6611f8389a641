//! Presence classification with two-sided hysteresis.
//!
//! Raw face-visibility samples arrive at a fixed polling cadence (nominally
//! 2 Hz) and are noisy: a glance at a notebook drops a frame or two, a person
//! walking past adds one. The classifier debounces the stream into a binary
//! present/away state with asymmetric thresholds: going away requires a few
//! seconds of continuous absence, coming back requires about a second of
//! continuous presence. Both countdowns restart on any contradicting sample.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::ms_between;

/// Hysteresis thresholds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Continuous absence required before flagging away. Default 4000.
    pub away_threshold_ms: u64,

    /// Continuous presence required before flagging a return. Default 1000.
    pub return_threshold_ms: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            away_threshold_ms: 4000,
            return_threshold_ms: 1000,
        }
    }
}

/// Debounced presence state, as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    /// Still present, but the away countdown is running.
    PendingAway,
    Away,
}

/// Edge-triggered transition event. Fires exactly once per flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    Away,
    Returned,
}

/// Converts raw per-sample booleans into debounced presence transitions.
#[derive(Debug, Clone)]
pub struct PresenceClassifier {
    config: PresenceConfig,
    raw_face_visible: bool,
    is_present: bool,
    last_seen_at: Option<DateTime<Utc>>,
    away_started_at: Option<DateTime<Utc>>,
    total_away_ms: u64,
    pending_return_since: Option<DateTime<Utc>>,
}

impl PresenceClassifier {
    /// A new classifier, assumed present until samples say otherwise.
    #[must_use]
    pub const fn new(config: PresenceConfig) -> Self {
        Self {
            config,
            raw_face_visible: true,
            is_present: true,
            last_seen_at: None,
            away_started_at: None,
            total_away_ms: 0,
            pending_return_since: None,
        }
    }

    /// Feeds one raw sample, returning the transition it caused, if any.
    pub fn observe(&mut self, face_visible: bool, now: DateTime<Utc>) -> Option<PresenceEdge> {
        self.raw_face_visible = face_visible;
        if self.is_present {
            self.observe_while_present(face_visible, now)
        } else {
            self.observe_while_away(face_visible, now)
        }
    }

    fn observe_while_present(
        &mut self,
        face_visible: bool,
        now: DateTime<Utc>,
    ) -> Option<PresenceEdge> {
        if face_visible {
            self.last_seen_at = Some(now);
            return None;
        }
        // Anchor the countdown at the first negative sample if the face was
        // never seen, so a classifier that starts on an empty chair still
        // flags away after the threshold.
        let last_seen = *self.last_seen_at.get_or_insert(now);
        if ms_between(last_seen, now) < self.config.away_threshold_ms {
            return None;
        }
        self.is_present = false;
        self.away_started_at = Some(now);
        self.pending_return_since = None;
        tracing::debug!(away_threshold_ms = self.config.away_threshold_ms, "user away");
        Some(PresenceEdge::Away)
    }

    fn observe_while_away(
        &mut self,
        face_visible: bool,
        now: DateTime<Utc>,
    ) -> Option<PresenceEdge> {
        if !face_visible {
            // Any negative sample restarts the return window from scratch.
            self.pending_return_since = None;
            return None;
        }
        self.last_seen_at = Some(now);
        let pending_since = *self.pending_return_since.get_or_insert(now);
        if ms_between(pending_since, now) < self.config.return_threshold_ms {
            return None;
        }
        if let Some(away_started) = self.away_started_at.take() {
            self.total_away_ms += ms_between(away_started, now);
        }
        self.is_present = true;
        self.pending_return_since = None;
        tracing::debug!(total_away_ms = self.total_away_ms, "user returned");
        Some(PresenceEdge::Returned)
    }

    /// Current debounced state. Pure query.
    #[must_use]
    pub const fn state(&self) -> Presence {
        if !self.is_present {
            Presence::Away
        } else if self.raw_face_visible {
            Presence::Present
        } else {
            Presence::PendingAway
        }
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.is_present
    }

    #[must_use]
    pub const fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        self.last_seen_at
    }

    /// Committed away time plus the in-progress away interval. Pure query.
    #[must_use]
    pub fn away_time(&self, now: DateTime<Utc>) -> u64 {
        let open = self
            .away_started_at
            .map_or(0, |start| ms_between(start, now));
        self.total_away_ms + open
    }

    /// Zeroes the day-scoped away total. Called at day rollover.
    ///
    /// An in-progress away interval keeps running: its pre-rollover span
    /// belongs to the old day, so its count restarts from `now`.
    pub const fn reset_day(&mut self, now: DateTime<Utc>) {
        self.total_away_ms = 0;
        if !self.is_present {
            self.away_started_at = Some(now);
        }
    }
}

impl Default for PresenceClassifier {
    fn default() -> Self {
        Self::new(PresenceConfig::default())
    }
}
