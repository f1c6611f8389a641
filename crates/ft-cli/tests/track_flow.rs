//! End-to-end tests for the tracking flow.
//!
//! Drives the compiled binary: events in on stdin, persisted state out in
//! the database. Events carry explicit timestamps so accumulation totals are
//! exact regardless of wall-clock time during the test run.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use chrono::Utc;
use ft_db::Database;
use tempfile::TempDir;

fn ft_binary() -> String {
    env!("CARGO_BIN_EXE_ft").to_string()
}

/// Runs `ft track`, feeding the given lines to stdin and waiting for exit.
fn run_track(db_path: &Path, lines: &[&str]) {
    let mut child = Command::new(ft_binary())
        .env("FT_DATABASE_PATH", db_path)
        .arg("track")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn ft track");

    {
        let stdin = child.stdin.as_mut().expect("stdin not piped");
        for line in lines {
            writeln!(stdin, "{line}").expect("failed to write event");
        }
    }
    // Dropping stdin closes the pipe; EOF is the teardown signal.
    drop(child.stdin.take());

    let output = child.wait_with_output().expect("failed to wait for ft track");
    assert!(
        output.status.success(),
        "ft track should exit cleanly: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn manual_toggles_accumulate_exactly() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    run_track(
        &db_path,
        &[
            r#"{"type":"toggle","timestamp":"2025-03-01T09:00:00Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:25:00Z"}"#,
        ],
    );

    let db = Database::open(&db_path).unwrap();
    let slot = db.read_slot().unwrap().expect("slot should be written");
    assert_eq!(slot.accumulated_focus_ms, 25 * 60_000);
    assert_eq!(slot.session_count, 1);
    assert_eq!(slot.longest_streak_ms, 25 * 60_000);
    assert!(!slot.was_focusing);

    let today = Utc::now().date_naive();
    let records = db.query_range(today, today).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].focus_time_ms, 25 * 60_000);
    assert_eq!(records[0].session_count, 1);
}

#[test]
fn presence_edges_pause_and_resume_focus() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    let mut lines = vec![r#"{"type":"toggle","timestamp":"2025-03-01T09:00:00Z"}"#.to_string()];

    // Absent samples at 2 Hz from 09:10:00; the away threshold (4000ms)
    // trips at 09:10:04 and auto-pauses.
    for i in 0..10 {
        let secs = i / 2;
        let frac = if i % 2 == 0 { "000" } else { "500" };
        lines.push(format!(
            r#"{{"type":"presence","face_visible":false,"timestamp":"2025-03-01T09:10:{secs:02}.{frac}Z"}}"#
        ));
    }

    // Present again from 09:20:00; the return threshold (1000ms) trips at
    // 09:20:01 and auto-resumes.
    for ts in ["09:20:00.000", "09:20:00.500", "09:20:01.000"] {
        lines.push(format!(
            r#"{{"type":"presence","face_visible":true,"timestamp":"2025-03-01T{ts}Z"}}"#
        ));
    }

    // Close the second interval manually so teardown has nothing open.
    lines.push(r#"{"type":"toggle","timestamp":"2025-03-01T09:30:00Z"}"#.to_string());

    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    run_track(&db_path, &line_refs);

    let db = Database::open(&db_path).unwrap();
    let slot = db.read_slot().unwrap().unwrap();
    // 09:00:00-09:10:04 plus 09:20:01-09:30:00.
    assert_eq!(slot.accumulated_focus_ms, 604_000 + 599_000);
    assert_eq!(slot.session_count, 2);
    assert_eq!(slot.longest_streak_ms, 604_000);

    let today = Utc::now().date_naive();
    let records = db.query_range(today, today).unwrap();
    assert_eq!(records.len(), 1);
    // Away from 09:10:04 to 09:20:01.
    assert_eq!(records[0].away_time_ms, 597_000);
}

#[test]
fn work_phase_entry_starts_focus() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    run_track(
        &db_path,
        &[
            r#"{"type":"phase","phase":"work","timestamp":"2025-03-01T09:00:00Z"}"#,
            // Break entry does not pause; the toggle at 09:40 does.
            r#"{"type":"phase","phase":"break","timestamp":"2025-03-01T09:25:00Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:40:00Z"}"#,
        ],
    );

    let db = Database::open(&db_path).unwrap();
    let slot = db.read_slot().unwrap().unwrap();
    assert_eq!(slot.accumulated_focus_ms, 40 * 60_000);
    assert_eq!(slot.session_count, 1);
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    run_track(
        &db_path,
        &[
            "this is not json",
            r#"{"type":"snack"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:00:00Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:05:00Z"}"#,
        ],
    );

    let db = Database::open(&db_path).unwrap();
    let slot = db.read_slot().unwrap().unwrap();
    assert_eq!(slot.accumulated_focus_ms, 5 * 60_000);
}

#[test]
fn restart_restores_same_day_counters_paused() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    run_track(
        &db_path,
        &[
            r#"{"type":"toggle","timestamp":"2025-03-01T09:00:00Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:25:00Z"}"#,
        ],
    );

    // Second run on the same day: no events, immediate teardown.
    run_track(&db_path, &[]);

    let db = Database::open(&db_path).unwrap();
    let slot = db.read_slot().unwrap().unwrap();
    assert_eq!(slot.accumulated_focus_ms, 25 * 60_000);
    assert_eq!(slot.session_count, 1);
    assert!(!slot.was_focusing);
}

#[test]
fn status_and_report_read_the_tracked_day() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("ft.db");

    run_track(
        &db_path,
        &[
            r#"{"type":"toggle","timestamp":"2025-03-01T09:00:00Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-01T09:25:00Z"}"#,
        ],
    );

    let status = Command::new(ft_binary())
        .env("FT_DATABASE_PATH", &db_path)
        .arg("status")
        .output()
        .unwrap();
    assert!(status.status.success());
    let stdout = String::from_utf8_lossy(&status.stdout);
    assert!(stdout.contains("Focus time: 25m"), "unexpected status: {stdout}");
    assert!(stdout.contains("Sessions: 1"));

    let report = Command::new(ft_binary())
        .env("FT_DATABASE_PATH", &db_path)
        .args(["report", "--days", "1"])
        .output()
        .unwrap();
    assert!(report.status.success());
    let stdout = String::from_utf8_lossy(&report.stdout);
    assert!(stdout.contains("25m"), "unexpected report: {stdout}");
    assert!(stdout.contains("1 session"));
}
