//! Persistence sink wiring the engine to the database.
//!
//! Storage failures are swallowed here: the in-memory state stays
//! authoritative for the rest of the run, and the data-loss exposure is
//! bounded to the span since the last successful write.

use ft_core::{DayRecord, FlushSink, SessionSnapshot};
use ft_db::Database;

/// Writes engine flushes to the database, logging failures instead of
/// propagating them.
pub struct DbSink {
    db: Database,
}

impl DbSink {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

impl FlushSink for DbSink {
    fn persist_session(&mut self, snapshot: &SessionSnapshot) {
        if let Err(error) = self.db.write_slot(snapshot) {
            tracing::warn!(%error, "failed to persist session slot");
        }
    }

    fn record_day(&mut self, record: &DayRecord) {
        if let Err(error) = self.db.upsert_day(record) {
            tracing::warn!(%error, date = %record.date, "failed to upsert day record");
        }
    }
}
