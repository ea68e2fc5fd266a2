//! Attendance workbook: a full copy of the roster with each check-in flag.

use std::{sync::Arc, time::Duration};

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, warn};

use crate::{
    dao::{
        storage::{StorageResult, TableTarget},
        table::{Cell, Table},
    },
    state::{
        gate::{GatePolicy, PersistenceGate},
        roster::{RecordStore, RosterSnapshot},
    },
};

/// Label appended to the imported header for the check-in flag column.
pub const CHECKIN_COLUMN: &str = "Checkin";

/// What a single flush attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The attendance file now mirrors the roster.
    Written {
        /// Participant rows written.
        rows: usize,
    },
    /// Another flush held the gate; nothing was written.
    Skipped,
}

/// Materializes the whole roster into the attendance workbook.
pub struct AttendanceWriter {
    roster: Arc<RecordStore>,
    target: Arc<dyn TableTarget>,
    gate: PersistenceGate,
}

impl AttendanceWriter {
    /// Writer flushing `roster` into `target`, contending under `policy`.
    pub fn new(
        roster: Arc<RecordStore>,
        target: Arc<dyn TableTarget>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            roster,
            target,
            gate: PersistenceGate::new("attendance", policy),
        }
    }

    /// Serialize the current roster and replace the attendance file with it.
    ///
    /// The roster is snapshotted inside the gate so a flush never writes a
    /// state older than the one a concurrent flush already wrote.
    pub fn flush(&self) -> StorageResult<FlushOutcome> {
        let attempt = self.gate.try_run(|| {
            let table = attendance_table(&self.roster.snapshot());
            self.target
                .write_sheet(&table)
                .map(|()| table.data_rows().len())
        });

        match attempt {
            Some(written) => written.map(|rows| FlushOutcome::Written { rows }),
            None => Ok(FlushOutcome::Skipped),
        }
    }

    /// [`flush`](Self::flush), with failures logged instead of returned.
    ///
    /// The roster stays the source of truth; the next trigger retries.
    pub fn flush_logged(&self) -> Option<FlushOutcome> {
        match self.flush() {
            Ok(outcome @ FlushOutcome::Written { rows }) => {
                debug!(rows, "attendance workbook written");
                Some(outcome)
            }
            Ok(FlushOutcome::Skipped) => {
                debug!("attendance flush skipped; another flush in flight");
                Some(FlushOutcome::Skipped)
            }
            Err(err) => {
                error!(error = %err, "failed to write attendance workbook");
                None
            }
        }
    }

    /// Delete the attendance file. Returns `false` when it did not exist.
    pub fn reset(&self) -> StorageResult<bool> {
        self.target.remove()
    }
}

/// Build the attendance sheet: imported header plus [`CHECKIN_COLUMN`], then
/// one numbered row per participant in roster order.
pub fn attendance_table(snapshot: &RosterSnapshot) -> Table {
    let mut header = snapshot.header.clone();
    header.push(Cell::text(CHECKIN_COLUMN));

    let mut table = Table::with_header(header);
    for (index, (id, record)) in snapshot.records.iter().enumerate() {
        table.push_row(vec![
            Cell::Number((index + 1) as f64),
            Cell::text(id.as_str()),
            record.name.clone(),
            record.unit.clone(),
            record.team.clone(),
            record.phone.clone(),
            Cell::text(if record.checked_in { "TRUE" } else { "FALSE" }),
        ]);
    }
    table
}

/// Run one logged flush on the blocking pool and wait for it.
pub async fn flush_in_background(writer: Arc<AttendanceWriter>) -> Option<FlushOutcome> {
    match tokio::task::spawn_blocking(move || writer.flush_logged()).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(error = %err, "attendance flush task failed");
            None
        }
    }
}

/// Flush the attendance workbook every `period` for the lifetime of the process.
pub async fn run_periodic_flush(writer: Arc<AttendanceWriter>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if flush_in_background(writer.clone()).await.is_none() {
            warn!(
                retry_in_secs = period.as_secs(),
                "periodic attendance flush failed"
            );
        }
    }
}
