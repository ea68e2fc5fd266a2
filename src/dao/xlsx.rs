//! Single-sheet `.xlsx` files backing the attendance and score targets.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::dao::{
    storage::{StorageError, StorageResult, TableTarget},
    table::{Cell, Table},
};

/// A workbook file holding one named sheet.
#[derive(Debug, Clone)]
pub struct XlsxTarget {
    path: PathBuf,
    sheet: String,
}

impl XlsxTarget {
    /// Describe the sheet `sheet` inside the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    fn encode(&self, table: &Table) -> StorageResult<Vec<u8>> {
        let write_err = |err| StorageError::write(&self.path, "encoding workbook", err);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet.as_str()).map_err(write_err)?;

        for (row_index, row) in table.rows().iter().enumerate() {
            let row_num = u32::try_from(row_index).map_err(|err| {
                StorageError::write(&self.path, "too many rows for a worksheet", err)
            })?;
            for (col_index, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(col_index).map_err(|err| {
                    StorageError::write(&self.path, "too many columns for a worksheet", err)
                })?;
                match cell {
                    Cell::Empty => {}
                    Cell::Number(number) => {
                        worksheet
                            .write_number(row_num, col_num, *number)
                            .map_err(write_err)?;
                    }
                    Cell::Text(text) => {
                        worksheet
                            .write_string(row_num, col_num, text.as_str())
                            .map_err(write_err)?;
                    }
                }
            }
        }

        workbook.save_to_buffer().map_err(write_err)
    }
}

impl TableTarget for XlsxTarget {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_sheet(&self) -> StorageResult<Option<Table>> {
        if !self.exists() {
            return Ok(None);
        }

        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|err| StorageError::read(&self.path, "opening workbook", err))?;

        if !workbook.sheet_names().iter().any(|name| name == &self.sheet) {
            return Err(StorageError::MissingSheet {
                path: self.path.clone(),
                sheet: self.sheet.clone(),
            });
        }

        let range = workbook
            .worksheet_range(&self.sheet)
            .map_err(|err| StorageError::read(&self.path, "decoding worksheet", err))?;

        Ok(Some(table_from_range(&range)))
    }

    fn write_sheet(&self, table: &Table) -> StorageResult<()> {
        let buffer = self.encode(table)?;

        // Stage next to the destination so the final rename stays on one filesystem.
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir).map_err(|err| StorageError::io(dir, err))?;
        staged
            .write_all(&buffer)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|err| StorageError::io(staged.path(), err))?;
        staged
            .persist(&self.path)
            .map_err(|err| StorageError::io(&self.path, err.error))?;

        debug!(path = %self.path.display(), rows = table.rows().len(), "workbook written");
        Ok(())
    }

    fn remove(&self) -> StorageResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::io(&self.path, err)),
        }
    }
}

/// Convert a decoded range into rows addressed from A1.
///
/// calamine trims leading empty rows and columns; they are restored so row
/// offsets in the file stay meaningful to callers.
fn table_from_range(range: &Range<Data>) -> Table {
    let Some((first_row, first_col)) = range.start() else {
        return Table::default();
    };

    let mut rows: Vec<Vec<Cell>> = (0..first_row).map(|_| Vec::new()).collect();
    rows.extend(range.rows().map(|row| {
        std::iter::repeat_n(Cell::Empty, first_col as usize)
            .chain(row.iter().map(cell_from_data))
            .collect()
    }));
    Table::new(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::String(value) => Cell::Text(value.clone()),
        Data::Bool(true) => Cell::text("TRUE"),
        Data::Bool(false) => Cell::text("FALSE"),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(dir: &tempfile::TempDir, sheet: &str) -> XlsxTarget {
        XlsxTarget::new(dir.path().join("sheet.xlsx"), sheet)
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(&dir, "Scores");

        assert!(!target.exists());
        assert!(target.read_sheet().unwrap().is_none());
    }

    #[test]
    fn written_sheet_reads_back_with_types() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(&dir, "Scores");
        let table = Table::new(vec![
            vec![Cell::text("Team"), Cell::text("Score")],
            vec![Cell::text("T1"), Cell::Number(8.5)],
            vec![Cell::text("T2"), Cell::Number(7.0)],
        ]);

        target.write_sheet(&table).unwrap();

        assert!(target.exists());
        assert_eq!(target.read_sheet().unwrap(), Some(table));
    }

    #[test]
    fn rewrite_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(&dir, "Sheet1");
        target
            .write_sheet(&Table::new(vec![
                vec![Cell::text("a")],
                vec![Cell::text("b")],
                vec![Cell::text("c")],
            ]))
            .unwrap();

        let smaller = Table::new(vec![vec![Cell::text("only")]]);
        target.write_sheet(&smaller).unwrap();

        assert_eq!(target.read_sheet().unwrap(), Some(smaller));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "staging files must not linger");
    }

    #[test]
    fn leading_blank_rows_keep_their_offset() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(&dir, "Sheet1");
        target
            .write_sheet(&Table::new(vec![
                vec![],
                vec![],
                vec![Cell::text("Id"), Cell::text("Name")],
                vec![Cell::text("A001"), Cell::text("Lan")],
            ]))
            .unwrap();

        let table = target.read_sheet().unwrap().unwrap();
        assert_eq!(table.rows().len(), 4);
        assert_eq!(table.rows()[2], vec![Cell::text("Id"), Cell::text("Name")]);
    }

    #[test]
    fn unknown_sheet_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        target(&dir, "Sheet1")
            .write_sheet(&Table::with_header(vec![Cell::text("x")]))
            .unwrap();

        let err = target(&dir, "Scores").read_sheet().unwrap_err();
        assert!(matches!(err, StorageError::MissingSheet { .. }));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(&dir, "Sheet1");
        target
            .write_sheet(&Table::with_header(vec![Cell::text("x")]))
            .unwrap();

        assert!(target.remove().unwrap());
        assert!(!target.remove().unwrap());
        assert!(!target.exists());
    }
}
