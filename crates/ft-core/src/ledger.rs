//! Restore and rollover rules for persisted session state.
//!
//! The persisted slot is only trusted when its calendar date matches today's.
//! A matching restore adopts the committed counters but always comes back
//! paused: the wall-clock gap while the process was down is indistinguishable
//! from genuine focus, so an open interval claimed by the blob is discarded.
//! A stale or missing slot yields a fresh session anchored at `now`.

use chrono::{DateTime, Utc};

use crate::session::{FocusSession, SessionSnapshot};

/// Builds the live session from the persisted slot, applying day rollover.
#[must_use]
pub fn restore_session(slot: Option<SessionSnapshot>, now: DateTime<Utc>) -> FocusSession {
    match slot {
        Some(snapshot) if snapshot.date == now.date_naive() => {
            tracing::debug!(
                date = %snapshot.date,
                accumulated_focus_ms = snapshot.accumulated_focus_ms,
                "restored same-day session"
            );
            FocusSession::from_snapshot(&snapshot)
        }
        Some(snapshot) => {
            tracing::info!(
                stale_date = %snapshot.date,
                today = %now.date_naive(),
                "persisted session is from a previous day, starting fresh"
            );
            FocusSession::fresh(now)
        }
        None => FocusSession::fresh(now),
    }
}
