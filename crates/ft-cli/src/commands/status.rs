//! Status command for showing today's focus state.
//!
//! Reads the persisted slot and renders the restored view. Restore always
//! comes back paused, so this shows committed totals only; live in-progress
//! intervals are visible in the tracker's own output, not here.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ft_core::restore_session;
use ft_db::Database;

use super::report::format_duration;

pub fn run<W: Write>(writer: &mut W, db: &Database, now: DateTime<Utc>) -> Result<()> {
    let session = restore_session(db.read_slot()?, now);

    writeln!(writer, "Focus tracker status")?;
    writeln!(writer, "Date: {}", session.day_key())?;
    writeln!(
        writer,
        "Focus time: {}",
        format_duration(session.current_focus_ms(now))
    )?;
    writeln!(writer, "Sessions: {}", session.session_count())?;
    writeln!(
        writer,
        "Longest streak: {}",
        format_duration(session.longest_streak_ms())
    )?;
    writeln!(
        writer,
        "Productivity: {:.1}%",
        session.productivity_pct(now)
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use ft_core::SessionSnapshot;
    use insta::assert_snapshot;

    #[test]
    fn status_renders_restored_snapshot() {
        let db = Database::open_in_memory().unwrap();
        let day_start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        db.write_slot(&SessionSnapshot {
            date: day_start.date_naive(),
            day_start,
            accumulated_focus_ms: 40 * 60_000,
            session_count: 2,
            longest_streak_ms: 25 * 60_000,
            was_focusing: false,
        })
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 45, 0).unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, now).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert_snapshot!(output, @r"
        Focus tracker status
        Date: 2025-03-01
        Focus time: 40m
        Sessions: 2
        Longest streak: 25m
        Productivity: 88.9%
        ");
    }

    #[test]
    fn status_with_stale_slot_shows_fresh_day() {
        let db = Database::open_in_memory().unwrap();
        let day_start = Utc.with_ymd_and_hms(2025, 2, 27, 9, 0, 0).unwrap();
        db.write_slot(&SessionSnapshot {
            date: day_start.date_naive(),
            day_start,
            accumulated_focus_ms: 40 * 60_000,
            session_count: 2,
            longest_streak_ms: 25 * 60_000,
            was_focusing: true,
        })
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut output = Vec::new();
        run(&mut output, &db, now).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Date: 2025-03-01"));
        assert!(output.contains("Focus time: 0m"));
        assert!(output.contains("Sessions: 0"));
    }
}
