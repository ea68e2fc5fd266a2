//! Shared application state.

/// Single-writer guard for persisted files.
pub mod gate;
/// In-memory participant registry.
pub mod roster;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::{storage::TableTarget, xlsx::XlsxTarget},
    services::{attendance_writer::AttendanceWriter, score_ledger::ScoreLedger},
};

use self::roster::RecordStore;

/// State handle shared by handlers and background tasks.
pub type SharedState = Arc<AppState>;

/// Central application state: the roster plus the components owning each persisted file.
///
/// Handlers receive it through axum state; nothing reaches the roster through a global.
pub struct AppState {
    config: Arc<AppConfig>,
    roster: Arc<RecordStore>,
    attendance: Arc<AttendanceWriter>,
    scores: Arc<ScoreLedger>,
}

impl AppState {
    /// Construct the state backed by the workbooks named in `config`.
    ///
    /// The roster starts empty; seed it with the startup import.
    pub fn new(config: AppConfig) -> SharedState {
        let attendance: Arc<dyn TableTarget> = Arc::new(XlsxTarget::new(
            config.attendance_path(),
            config.attendance.sheet.clone(),
        ));
        let scores: Arc<dyn TableTarget> = Arc::new(XlsxTarget::new(
            config.scores_path(),
            config.scores.sheet.clone(),
        ));
        Self::with_targets(config, Arc::new(RecordStore::new()), attendance, scores)
    }

    /// Construct the state around explicit storage targets.
    pub fn with_targets(
        config: AppConfig,
        roster: Arc<RecordStore>,
        attendance_target: Arc<dyn TableTarget>,
        score_target: Arc<dyn TableTarget>,
    ) -> SharedState {
        let attendance = Arc::new(AttendanceWriter::new(
            roster.clone(),
            attendance_target,
            config.attendance.gate_policy,
        ));
        let scores = Arc::new(ScoreLedger::new(score_target, config.utc_offset()));

        Arc::new(Self {
            config: Arc::new(config),
            roster,
            attendance,
            scores,
        })
    }

    /// Configuration loaded at startup.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Authoritative participant registry.
    pub fn roster(&self) -> &Arc<RecordStore> {
        &self.roster
    }

    /// Writer owning the attendance workbook.
    pub fn attendance(&self) -> &Arc<AttendanceWriter> {
        &self.attendance
    }

    /// Ledger owning the score workbook.
    pub fn scores(&self) -> &Arc<ScoreLedger> {
        &self.scores
    }
}
