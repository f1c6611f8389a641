//! Report command for the per-day focus history.
//!
//! Renders the historical stats range as a table (or JSON with `--json`).
//! Days with no activity have no row and are simply skipped.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use ft_db::Database;

/// Formats milliseconds as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
pub fn format_duration(ms: u64) -> String {
    let total_minutes = ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Generates a 10-character progress bar.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: u64, max: u64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1 // Minimum 1 for visibility
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    days: u32,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let records = db.query_last_n_days(days, today)?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &records)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Focus report: last {days} days")?;
    writeln!(writer)?;

    if records.is_empty() {
        writeln!(writer, "No tracked days in range.")?;
        return Ok(());
    }

    let max_focus = records.iter().map(|r| r.focus_time_ms).max().unwrap_or(0);
    for record in &records {
        let sessions = if record.session_count == 1 {
            "1 session".to_string()
        } else {
            format!("{} sessions", record.session_count)
        };
        writeln!(
            writer,
            "{}  {:>7}  {}  {:>5.1}%  {}",
            record.date,
            format_duration(record.focus_time_ms),
            progress_bar(record.focus_time_ms, max_focus),
            record.productivity_pct,
            sessions,
        )?;
    }

    let total: u64 = records.iter().map(|r| r.focus_time_ms).sum();
    let day_word = if records.len() == 1 { "day" } else { "days" };
    writeln!(writer)?;
    writeln!(
        writer,
        "Total: {} focused across {} tracked {day_word}",
        format_duration(total),
        records.len(),
    )?;

    Ok(())
}
