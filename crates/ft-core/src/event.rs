//! Input events for the tracking host.
//!
//! The host consumes a single stream of JSON events covering all three focus
//! triggers. Timestamps are optional on the wire; events without one are
//! stamped at receipt. Accepting explicit timestamps keeps replays and tests
//! deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pomodoro phase reported by the external phase notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    Work,
    Break,
}

/// One event on the host's input stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackEvent {
    /// A raw sample from the presence capability.
    Presence {
        face_visible: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Manual focus toggle from the user.
    Toggle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Pomodoro phase transition.
    Phase {
        phase: PomodoroPhase,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
    /// An expression-model score reading, for mood display only.
    Mood {
        score: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
    },
}

impl TrackEvent {
    /// The event's own timestamp, if it carried one.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Presence { timestamp, .. }
            | Self::Toggle { timestamp }
            | Self::Phase { timestamp, .. }
            | Self::Mood { timestamp, .. } => *timestamp,
        }
    }
}
