//! Track command: the long-running engine host.
//!
//! Reads one JSON event per line from stdin and funnels every trigger
//! through a single `select!` loop, so state transitions never interleave.
//! Expected events:
//!
//! ```json
//! {"type":"presence","face_visible":true}
//! {"type":"toggle"}
//! {"type":"phase","phase":"work"}
//! {"type":"mood","score":0.7}
//! ```
//!
//! Events may carry an explicit `timestamp`; otherwise they are stamped at
//! receipt. The loop flushes persistence on a periodic tick and once more at
//! teardown (stdin EOF or Ctrl-C), pausing any open interval so it is
//! credited before the process exits.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::io::AsyncBufReadExt;
use tokio::time::MissedTickBehavior;

use ft_core::{
    FlushSink, FocusEngine, FocusTrigger, Mood, PresenceClassifier, TrackEvent, restore_session,
};
use ft_db::Database;

use crate::config::Config;
use crate::sink::DbSink;

pub async fn run(db: Database, config: &Config) -> Result<()> {
    let now = Utc::now();
    let session = restore_session(db.read_slot()?, now);
    let mut engine = FocusEngine::new(session, DbSink::new(db));
    let mut classifier = PresenceClassifier::new(config.presence());
    let mut saw_presence = false;

    // Claim the slot right away so a crash before the first tick still
    // leaves a restorable anchor.
    engine.flush(now);
    tracing::info!(
        date = %engine.session().day_key(),
        accumulated_focus_ms = engine.session().accumulated_focus_ms(),
        "tracking started"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    let mut flush_tick =
        tokio::time::interval(Duration::from_secs(config.flush_interval_secs.max(1)));
    flush_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    flush_tick.tick().await; // the first tick completes immediately

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&mut engine, &mut classifier, &mut saw_presence, &line),
                None => break,
            },
            _ = flush_tick.tick() => {
                handle_tick(&mut engine, &mut classifier, saw_presence, Utc::now());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Teardown: commit the open interval and write a final snapshot. This is
    // the deliberate-exit path; an outright kill loses at most the span since
    // the last flush.
    let now = Utc::now();
    engine.set_away_time(classifier.away_time(now));
    engine.pause_focus(now, FocusTrigger::Teardown);
    engine.flush(now);
    tracing::info!("tracking stopped");
    Ok(())
}

/// Rolls the calendar day if `now` has moved past it.
///
/// The classifier's day-scoped total resets alongside the session, so the
/// new day's records never carry the old day's away time.
fn roll_day<S: FlushSink>(
    engine: &mut FocusEngine<S>,
    classifier: &mut PresenceClassifier,
    now: DateTime<Utc>,
) {
    if engine.roll_day_if_needed(now) {
        classifier.reset_day(now);
    }
}

/// Periodic flush: the only path that notices a day boundary during a quiet
/// stretch with no stdin events.
fn handle_tick<S: FlushSink>(
    engine: &mut FocusEngine<S>,
    classifier: &mut PresenceClassifier,
    saw_presence: bool,
    now: DateTime<Utc>,
) {
    roll_day(engine, classifier, now);
    engine.set_away_time(classifier.away_time(now));
    engine.flush(now);
    if !saw_presence {
        tracing::warn!(
            "no presence samples received; tracking on manual and Pomodoro triggers only"
        );
    }
    tracing::info!(
        focusing = engine.is_focusing(),
        focus_ms = engine.session().current_focus_ms(now),
        productivity_pct = %format_args!("{:.1}", engine.session().productivity_pct(now)),
        "periodic flush"
    );
}

fn handle_line<S: FlushSink>(
    engine: &mut FocusEngine<S>,
    classifier: &mut PresenceClassifier,
    saw_presence: &mut bool,
    line: &str,
) {
    if line.trim().is_empty() {
        return;
    }
    let event: TrackEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(error) => {
            tracing::warn!(%error, line, "skipping malformed event");
            return;
        }
    };

    let now = event.timestamp().unwrap_or_else(Utc::now);
    roll_day(engine, classifier, now);

    match event {
        TrackEvent::Presence { face_visible, .. } => {
            *saw_presence = true;
            let edge = classifier.observe(face_visible, now);
            engine.set_away_time(classifier.away_time(now));
            if let Some(edge) = edge {
                engine.apply_presence_edge(edge, now);
            }
        }
        TrackEvent::Toggle { .. } => engine.toggle(now),
        TrackEvent::Phase { phase, .. } => engine.apply_phase(phase, now),
        TrackEvent::Mood { score, .. } => {
            tracing::info!(mood = %Mood::from_score(score), score, "mood reading");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeZone;
    use ft_core::{DayRecord, FocusSession, PresenceConfig, SessionSnapshot};

    use super::*;

    /// Captures day records through a shared handle the test can inspect.
    #[derive(Debug, Default, Clone)]
    struct SharedSink {
        day_records: Rc<RefCell<Vec<DayRecord>>>,
    }

    impl FlushSink for SharedSink {
        fn persist_session(&mut self, _snapshot: &SessionSnapshot) {}

        fn record_day(&mut self, record: &DayRecord) {
            self.day_records.borrow_mut().push(record.clone());
        }
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, h, m, s).unwrap()
    }

    #[test]
    fn tick_rollover_leaves_away_time_in_the_old_day() {
        let sink = SharedSink::default();
        let records = Rc::clone(&sink.day_records);
        let mut engine = FocusEngine::new(FocusSession::fresh(at(1, 23, 0, 0)), sink);
        let mut classifier = PresenceClassifier::new(PresenceConfig::default());

        // Away 23:00:04 to 23:10:01, committed on return.
        classifier.observe(true, at(1, 23, 0, 0));
        classifier.observe(false, at(1, 23, 0, 4));
        classifier.observe(true, at(1, 23, 10, 0));
        classifier.observe(true, at(1, 23, 10, 1));

        handle_tick(&mut engine, &mut classifier, true, at(1, 23, 30, 0));

        // Quiet overnight: the next tick is the first to see the new day.
        handle_tick(&mut engine, &mut classifier, true, at(2, 1, 0, 0));

        let records = records.borrow();
        let day1 = records
            .iter()
            .find(|r| r.date == at(1, 23, 0, 0).date_naive())
            .unwrap();
        assert_eq!(day1.away_time_ms, 597_000);

        let day2 = records.last().unwrap();
        assert_eq!(day2.date, at(2, 1, 0, 0).date_naive());
        assert_eq!(day2.away_time_ms, 0);
    }

    #[test]
    fn stdin_rollover_restarts_the_away_count_in_the_new_day() {
        let sink = SharedSink::default();
        let records = Rc::clone(&sink.day_records);
        let mut engine = FocusEngine::new(FocusSession::fresh(at(1, 23, 0, 0)), sink);
        let mut classifier = PresenceClassifier::new(PresenceConfig::default());
        let mut saw_presence = false;

        for line in [
            r#"{"type":"presence","face_visible":true,"timestamp":"2025-03-01T23:00:00Z"}"#,
            r#"{"type":"presence","face_visible":false,"timestamp":"2025-03-01T23:00:04Z"}"#,
            r#"{"type":"toggle","timestamp":"2025-03-02T08:00:00Z"}"#,
        ] {
            handle_line(&mut engine, &mut classifier, &mut saw_presence, line);
        }

        assert_eq!(engine.session().day_key(), at(2, 8, 0, 0).date_naive());
        assert!(engine.is_focusing());

        // Still away across the boundary; the open interval re-anchored at
        // the rollover, so only the new day's span counts.
        assert_eq!(classifier.away_time(at(2, 8, 5, 0)), 300_000);

        handle_tick(&mut engine, &mut classifier, true, at(2, 8, 5, 0));
        let last = records.borrow().last().cloned().unwrap();
        assert_eq!(last.date, at(2, 8, 5, 0).date_naive());
        assert_eq!(last.away_time_ms, 300_000);
    }
}
