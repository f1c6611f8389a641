//! Reset command: discard today's accumulated focus state.
//!
//! Discarding non-zero accumulated time requires a confirmation, supplied
//! either interactively or with `--yes`. The reset overwrites both the
//! session slot and today's stats row with zeroed state.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{DateTime, Utc};

use ft_core::{FocusSession, restore_session};
use ft_db::Database;

use super::report::format_duration;

pub fn run<W: Write, R: BufRead>(
    writer: &mut W,
    input: &mut R,
    db: &Database,
    yes: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let session = restore_session(db.read_slot()?, now);
    let accumulated = session.current_focus_ms(now);

    if accumulated > 0 && !yes {
        write!(
            writer,
            "Discard {} of focus accumulated today? [y/N] ",
            format_duration(accumulated)
        )?;
        writer.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(writer, "Aborted.")?;
            return Ok(());
        }
    }

    let fresh = FocusSession::fresh(now);
    db.write_slot(&fresh.snapshot())?;
    db.upsert_day(&fresh.day_record(now, 0))?;
    writeln!(writer, "Focus state reset.")?;

    Ok(())
}
