//! Score workbook: one row per (team, judge) pair, rewritten as a whole on every submission.

use std::sync::Arc;

use indexmap::IndexMap;
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};
use tracing::{error, info};

use crate::{
    dao::{
        storage::{StorageResult, TableTarget},
        table::{Cell, Table},
    },
    error::ServiceError,
    state::gate::{GatePolicy, PersistenceGate},
};

/// Column labels of a freshly created score sheet.
pub const SCORE_HEADER: [&str; 11] = [
    "Team",
    "Judge",
    "Understanding",
    "Logic",
    "Expression",
    "Expression 2",
    "Teamwork",
    "Creativity",
    "Completion",
    "Total",
    "Submitted At",
];

const TEAM_COLUMN: usize = 0;
const JUDGE_COLUMN: usize = 1;
const FIRST_SUB_SCORE_COLUMN: usize = 2;
/// Four content dimensions followed by three delivery dimensions.
pub const SUB_SCORE_COUNT: usize = 7;

const SUBMITTED_AT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second] [day]/[month]/[year]");

/// Sub-scores sent by a judge; `None` keeps the previously stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreSubmission {
    /// Understanding of the topic.
    pub understanding: Option<f64>,
    /// Logic of the argument.
    pub logic: Option<f64>,
    /// Expression, first criterion.
    pub expression: Option<f64>,
    /// Expression, second criterion.
    pub expression1: Option<f64>,
    /// Teamwork.
    pub teamwork: Option<f64>,
    /// Creativity.
    pub creativity: Option<f64>,
    /// Completion.
    pub completion: Option<f64>,
}

impl ScoreSubmission {
    /// Values in column order.
    fn values(&self) -> [Option<f64>; SUB_SCORE_COUNT] {
        [
            self.understanding,
            self.logic,
            self.expression,
            self.expression1,
            self.teamwork,
            self.creativity,
            self.completion,
        ]
    }
}

/// The row stored for a (team, judge) pair after an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    /// Team key, stored as text.
    pub team_id: String,
    /// Judge key, stored as text.
    pub judge_id: String,
    /// Sub-scores in column order.
    pub sub_scores: [Cell; SUB_SCORE_COUNT],
    /// Sum of the sub-scores with exactly two decimals.
    pub total: String,
    /// Time of the upsert at the configured offset.
    pub submitted_at: String,
}

impl ScoreRow {
    fn to_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(SCORE_HEADER.len());
        cells.push(Cell::text(self.team_id.as_str()));
        cells.push(Cell::text(self.judge_id.as_str()));
        cells.extend(self.sub_scores.iter().cloned());
        cells.push(Cell::text(self.total.as_str()));
        cells.push(Cell::text(self.submitted_at.as_str()));
        cells
    }
}

/// Owner of the score workbook.
pub struct ScoreLedger {
    target: Arc<dyn TableTarget>,
    gate: PersistenceGate,
    offset: UtcOffset,
}

impl ScoreLedger {
    /// Submission timestamps are rendered at `offset`.
    pub fn new(target: Arc<dyn TableTarget>, offset: UtcOffset) -> Self {
        Self {
            target,
            gate: PersistenceGate::new("scores", GatePolicy::Drop),
            offset,
        }
    }

    /// Insert or replace the row for (`team_id`, `judge_id`).
    ///
    /// Sub-scores missing from `submission` are carried over from the
    /// replaced row, or default to zero. The new row is appended after every
    /// other row. Fails with [`ServiceError::Busy`] when another submission is
    /// being written; nothing is retried.
    pub fn upsert(
        &self,
        team_id: &str,
        judge_id: &str,
        submission: &ScoreSubmission,
    ) -> Result<ScoreRow, ServiceError> {
        self.upsert_at(team_id, judge_id, submission, OffsetDateTime::now_utc())
    }

    fn upsert_at(
        &self,
        team_id: &str,
        judge_id: &str,
        submission: &ScoreSubmission,
        now: OffsetDateTime,
    ) -> Result<ScoreRow, ServiceError> {
        let outcome = self
            .gate
            .try_run(|| self.merge_and_write(team_id, judge_id, submission, now));

        match outcome {
            Some(Ok(row)) => {
                info!(team_id, judge_id, total = %row.total, "score saved");
                Ok(row)
            }
            Some(Err(err)) => {
                error!(team_id, judge_id, error = %err, "failed to save score");
                Err(err.into())
            }
            None => Err(ServiceError::Busy(
                "another score submission is being saved; try again".into(),
            )),
        }
    }

    fn merge_and_write(
        &self,
        team_id: &str,
        judge_id: &str,
        submission: &ScoreSubmission,
        now: OffsetDateTime,
    ) -> StorageResult<ScoreRow> {
        let mut rows = match self.target.read_sheet()? {
            Some(table) if !table.is_empty() => table.into_rows(),
            _ => Vec::new(),
        };
        let header = if rows.is_empty() {
            canonical_header()
        } else {
            rows.remove(0)
        };

        // Every row with the key is dropped; the last one supplies carried values.
        let mut prior = None;
        let mut others = Vec::with_capacity(rows.len());
        for row in rows {
            if row_matches(&row, team_id, judge_id) {
                prior = Some(row);
            } else {
                others.push(row);
            }
        }

        let row = self.resolve_row(team_id, judge_id, submission, prior.as_deref(), now);

        let mut table = Table::with_header(header);
        for other in others {
            table.push_row(other);
        }
        table.push_row(row.to_cells());
        self.target.write_sheet(&table)?;

        Ok(row)
    }

    fn resolve_row(
        &self,
        team_id: &str,
        judge_id: &str,
        submission: &ScoreSubmission,
        prior: Option<&[Cell]>,
        now: OffsetDateTime,
    ) -> ScoreRow {
        let submitted = submission.values();
        let sub_scores: [Cell; SUB_SCORE_COUNT] = std::array::from_fn(|index| {
            submitted[index].map(Cell::Number).unwrap_or_else(|| match prior {
                // Blank prior cells stay blank; they count as zero in the total.
                Some(row) => row
                    .get(FIRST_SUB_SCORE_COLUMN + index)
                    .cloned()
                    .unwrap_or_default(),
                None => Cell::Number(0.0),
            })
        });

        let total: f64 = sub_scores.iter().map(Cell::as_f64_lossy).sum();

        ScoreRow {
            team_id: team_id.to_owned(),
            judge_id: judge_id.to_owned(),
            sub_scores,
            total: format!("{total:.2}"),
            submitted_at: format_submitted_at(now, self.offset),
        }
    }

    /// Every stored row keyed by header label; empty when no score file exists.
    pub fn list(&self) -> StorageResult<Vec<IndexMap<String, Cell>>> {
        let Some(table) = self.target.read_sheet()? else {
            return Ok(Vec::new());
        };
        let Some(header) = table.header() else {
            return Ok(Vec::new());
        };

        let labels: Vec<String> = header.iter().map(ToString::to_string).collect();
        let rows = table
            .data_rows()
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|row| {
                labels
                    .iter()
                    .enumerate()
                    .filter(|(_, label)| !label.is_empty())
                    .map(|(index, label)| {
                        let cell = match row.get(index) {
                            Some(cell) if !cell.is_empty() => cell.clone(),
                            _ => Cell::text(""),
                        };
                        (label.clone(), cell)
                    })
                    .collect()
            })
            .collect();

        Ok(rows)
    }

    /// Delete the score file. Returns `false` when it did not exist.
    pub fn reset(&self) -> StorageResult<bool> {
        self.target.remove()
    }
}

fn canonical_header() -> Vec<Cell> {
    SCORE_HEADER.iter().copied().map(Cell::from).collect()
}

fn row_matches(row: &[Cell], team_id: &str, judge_id: &str) -> bool {
    let cell_matches = |column: usize, key: &str| {
        row.get(column)
            .is_some_and(|cell| cell.loosely_eq(key))
    };
    cell_matches(TEAM_COLUMN, team_id) && cell_matches(JUDGE_COLUMN, judge_id)
}

fn format_submitted_at(now: OffsetDateTime, offset: UtcOffset) -> String {
    now.to_offset(offset)
        .format(SUBMITTED_AT_FORMAT)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
