//! Duration accumulation with start/stop interval semantics.
//!
//! The accumulator is the arithmetic core of focus tracking: it credits time
//! only for closed intervals, keeps the longest single interval of the day,
//! and answers live-total queries without mutating anything. All values are
//! integer milliseconds; no floating point enters the accumulation path.

use chrono::{DateTime, Utc};

use crate::clock::ms_between;

/// Tracks committed focus time plus at most one open interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationAccumulator {
    accumulated_ms: u64,
    longest_streak_ms: u64,
    active_interval_start: Option<DateTime<Utc>>,
}

impl DurationAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an accumulator from persisted counters, always closed.
    #[must_use]
    pub const fn from_committed(accumulated_ms: u64, longest_streak_ms: u64) -> Self {
        Self {
            accumulated_ms,
            longest_streak_ms,
            active_interval_start: None,
        }
    }

    /// Opens an interval at `now`.
    ///
    /// Returns `false` (and changes nothing) if an interval is already open.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.active_interval_start.is_some() {
            return false;
        }
        self.active_interval_start = Some(now);
        true
    }

    /// Closes the open interval at `now`, crediting its duration.
    ///
    /// Returns the credited milliseconds, or `None` if no interval was open.
    /// The longest-streak counter is only ever updated here: an in-progress
    /// interval never counts as a streak until it is committed.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<u64> {
        let start = self.active_interval_start.take()?;
        let elapsed = ms_between(start, now);
        self.accumulated_ms += elapsed;
        self.longest_streak_ms = self.longest_streak_ms.max(elapsed);
        Some(elapsed)
    }

    /// Committed time plus the open interval, if any. Pure query.
    #[must_use]
    pub fn current_total(&self, now: DateTime<Utc>) -> u64 {
        let open = self
            .active_interval_start
            .map_or(0, |start| ms_between(start, now));
        self.accumulated_ms + open
    }

    /// Zeroes all counters and discards any open interval without crediting it.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub const fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    #[must_use]
    pub const fn longest_streak_ms(&self) -> u64 {
        self.longest_streak_ms
    }

    #[must_use]
    pub const fn active_since(&self) -> Option<DateTime<Utc>> {
        self.active_interval_start
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active_interval_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn start_stop_credits_elapsed() {
        let mut acc = DurationAccumulator::new();
        assert!(acc.start(at(0)));
        assert_eq!(acc.stop(at(5000)), Some(5000));
        assert_eq!(acc.accumulated_ms(), 5000);
        assert_eq!(acc.longest_streak_ms(), 5000);
        assert!(!acc.is_active());
    }

    #[test]
    fn double_start_is_rejected() {
        let mut acc = DurationAccumulator::new();
        assert!(acc.start(at(0)));
        assert!(!acc.start(at(1000)));
        // The original start time survives the rejected call.
        assert_eq!(acc.stop(at(3000)), Some(3000));
    }

    #[test]
    fn stop_without_open_interval_is_noop() {
        let mut acc = DurationAccumulator::new();
        assert_eq!(acc.stop(at(1000)), None);
        assert_eq!(acc.accumulated_ms(), 0);
    }

    #[test]
    fn longest_streak_keeps_maximum_committed_interval() {
        let mut acc = DurationAccumulator::new();
        acc.start(at(0));
        acc.stop(at(25 * 60_000));
        acc.start(at(30 * 60_000));
        acc.stop(at(45 * 60_000));
        assert_eq!(acc.accumulated_ms(), 40 * 60_000);
        assert_eq!(acc.longest_streak_ms(), 25 * 60_000);
    }

    #[test]
    fn current_total_includes_open_interval_without_committing() {
        let mut acc = DurationAccumulator::new();
        acc.start(at(0));
        acc.stop(at(2000));
        acc.start(at(10_000));
        assert_eq!(acc.current_total(at(13_000)), 5000);
        // The query did not commit anything.
        assert_eq!(acc.accumulated_ms(), 2000);
        assert_eq!(acc.longest_streak_ms(), 2000);
    }

    #[test]
    fn backwards_clock_credits_zero_not_negative() {
        let mut acc = DurationAccumulator::new();
        acc.start(at(10_000));
        assert_eq!(acc.stop(at(4000)), Some(0));
        assert_eq!(acc.accumulated_ms(), 0);
    }

    #[test]
    fn reset_discards_open_interval() {
        let mut acc = DurationAccumulator::new();
        acc.start(at(0));
        acc.reset();
        assert_eq!(acc.current_total(at(60_000)), 0);
        assert!(!acc.is_active());
    }
}
