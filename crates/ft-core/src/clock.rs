//! Clamped millisecond arithmetic on wall-clock timestamps.
//!
//! The system clock is not monotonic: it can be adjusted backwards by NTP or
//! by the user. Every elapsed-time computation in the accumulation path goes
//! through [`ms_between`], which floors negative deltas at zero so a single
//! bad reading can never corrupt an accumulator.

use chrono::{DateTime, Utc};

/// Milliseconds from `start` to `end`, clamped at zero if `end < start`.
#[must_use]
pub fn ms_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn forward_delta_in_milliseconds() {
        assert_eq!(ms_between(at(100), at(105)), 5000);
    }

    #[test]
    fn zero_delta() {
        assert_eq!(ms_between(at(100), at(100)), 0);
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        assert_eq!(ms_between(at(105), at(100)), 0);
    }
}
