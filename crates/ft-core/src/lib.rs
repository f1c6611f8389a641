//! Core domain logic for the focus tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Duration accumulation: start/stop interval arithmetic for focus time
//! - Presence classification: debouncing a raw face-visibility signal
//! - Focus state reconciliation: merging manual, presence, and Pomodoro
//!   triggers into one focusing/paused state
//! - Session ledger semantics: restore/rollover rules for persisted state

pub mod accumulator;
pub mod clock;
pub mod engine;
pub mod event;
pub mod ledger;
pub mod mood;
pub mod presence;
pub mod session;

pub use accumulator::DurationAccumulator;
pub use engine::{FlushSink, FocusEngine, FocusTrigger, NullSink};
pub use event::{PomodoroPhase, TrackEvent};
pub use ledger::restore_session;
pub use mood::Mood;
pub use presence::{Presence, PresenceClassifier, PresenceConfig, PresenceEdge};
pub use session::{DayRecord, FocusSession, SessionSnapshot};
