//! One-time import of participants from the roster workbook at startup.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    config::RosterConfig,
    dao::{
        storage::{StorageError, TableTarget},
        table::Cell,
    },
    state::roster::{ParticipantRecord, RecordStore, normalize_id},
};

/// Reasons the roster cannot be imported.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The roster workbook does not exist.
    #[error("roster workbook not found")]
    MissingFile,
    /// The configured header row is absent or blank.
    #[error("roster sheet has no header at row {row}")]
    MissingHeader {
        /// Configured zero-based header row.
        row: usize,
    },
    /// The identifier column label is not in the header.
    #[error("roster header has no `{label}` column")]
    MissingColumn {
        /// Label looked up.
        label: String,
    },
    /// The workbook could not be read.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Parsed roster ready to seed the [`RecordStore`].
#[derive(Debug, Default)]
pub struct RosterImport {
    /// Header row exactly as found in the workbook.
    pub header: Vec<Cell>,
    /// Participants keyed by normalized identifier, in sheet order.
    pub records: Vec<(String, ParticipantRecord)>,
    /// Rows dropped because their identifier was blank.
    pub skipped: usize,
}

struct ColumnIndexes {
    id: usize,
    name: Option<usize>,
    unit: Option<usize>,
    team: Option<usize>,
    phone: Option<usize>,
}

/// Read the roster sheet described by `layout`.
pub fn read_roster(
    target: &dyn TableTarget,
    layout: &RosterConfig,
) -> Result<RosterImport, ImportError> {
    let table = target.read_sheet()?.ok_or(ImportError::MissingFile)?;
    let rows = table.rows();

    let header = rows
        .get(layout.header_row)
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .ok_or(ImportError::MissingHeader {
            row: layout.header_row,
        })?;

    let find = |label: &str| {
        header
            .iter()
            .position(|cell| matches!(cell, Cell::Text(text) if text.trim() == label.trim()))
    };
    let columns = ColumnIndexes {
        id: find(&layout.columns.id).ok_or_else(|| ImportError::MissingColumn {
            label: layout.columns.id.clone(),
        })?,
        name: find(&layout.columns.name),
        unit: find(&layout.columns.unit),
        team: find(&layout.columns.team),
        phone: find(&layout.columns.phone),
    };
    for (label, index) in [
        (&layout.columns.name, columns.name),
        (&layout.columns.unit, columns.unit),
        (&layout.columns.team, columns.team),
        (&layout.columns.phone, columns.phone),
    ] {
        if index.is_none() {
            warn!(label = %label, "roster column missing; values will be empty");
        }
    }

    let mut import = RosterImport {
        header: header.clone(),
        ..RosterImport::default()
    };
    for row in &rows[layout.header_row + 1..] {
        let cell_at = |index: Option<usize>| {
            index
                .and_then(|index| row.get(index))
                .cloned()
                .unwrap_or_default()
        };

        let id = normalize_id(&cell_at(Some(columns.id)).to_string());
        if id.is_empty() {
            import.skipped += 1;
            continue;
        }
        let record = ParticipantRecord::new(
            cell_at(columns.name),
            cell_at(columns.unit),
            cell_at(columns.team),
            cell_at(columns.phone),
        );
        import.records.push((id, record));
    }

    Ok(import)
}

/// Replace the contents of `store` with the roster read from `target`.
pub fn import_roster(
    store: &RecordStore,
    target: &dyn TableTarget,
    layout: &RosterConfig,
) -> Result<usize, ImportError> {
    let RosterImport {
        header,
        records,
        skipped,
    } = read_roster(target, layout)?;

    let imported = store.seed(header, records);
    info!(imported, skipped, "roster imported");
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{memory::MemoryTarget, table::Table};

    fn roster_table() -> Table {
        Table::new(vec![
            vec![Cell::text("EMPLOYEE LIST")],
            vec![],
            vec![
                Cell::text("STT"),
                Cell::text(" Mã NV "),
                Cell::text("Họ và tên"),
                Cell::text("Phòng ban"),
                Cell::text("ĐỘI"),
                Cell::text("Điện thoại"),
            ],
            vec![
                Cell::Number(1.0),
                Cell::text(" a001 "),
                Cell::text("Lan"),
                Cell::text("Sales"),
                Cell::text("Red"),
                Cell::Number(912345678.0),
            ],
            vec![Cell::Number(2.0), Cell::Empty, Cell::text("No id")],
            vec![
                Cell::Number(3.0),
                Cell::Number(1042.0),
                Cell::text("Minh"),
                Cell::Empty,
                Cell::text("Blue"),
            ],
        ])
    }

    #[test]
    fn reads_labelled_columns_below_header_offset() {
        let target = MemoryTarget::with_table(roster_table());
        let import = read_roster(&target, &RosterConfig::default()).unwrap();

        assert_eq!(import.header.len(), 6);
        assert_eq!(import.skipped, 1);
        assert_eq!(import.records.len(), 2);

        let (id, lan) = &import.records[0];
        assert_eq!(id, "A001");
        assert_eq!(lan.name, Cell::text("Lan"));
        assert_eq!(lan.phone, Cell::Number(912345678.0));
        assert!(!lan.checked_in);

        let (id, minh) = &import.records[1];
        assert_eq!(id, "1042");
        assert_eq!(minh.unit, Cell::Empty);
        assert_eq!(minh.phone, Cell::Empty);
    }

    #[test]
    fn seeds_store_in_sheet_order() {
        let target = MemoryTarget::with_table(roster_table());
        let store = RecordStore::new();

        let imported = import_roster(&store, &target, &RosterConfig::default()).unwrap();

        assert_eq!(imported, 2);
        assert_eq!(store.snapshot().header[1], Cell::text(" Mã NV "));
        assert!(store.get("a001").is_ok());
        assert!(store.get("1042").is_ok());
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let target = MemoryTarget::with_table(roster_table());
        let mut layout = RosterConfig::default();
        layout.columns.id = "Employee ID".into();

        let err = read_roster(&target, &layout).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { label } if label == "Employee ID"));
    }

    #[test]
    fn missing_workbook_or_header_is_reported() {
        let err = read_roster(&MemoryTarget::new(), &RosterConfig::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingFile));

        let mut layout = RosterConfig::default();
        layout.header_row = 1;
        let target = MemoryTarget::with_table(roster_table());
        let err = read_roster(&target, &layout).unwrap_err();
        assert!(matches!(err, ImportError::MissingHeader { row: 1 }));
    }
}
