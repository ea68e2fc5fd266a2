//! Storage seam between in-memory tables and their persisted files.

use std::{error::Error, io, path::PathBuf};
use thiserror::Error;

use crate::dao::table::Table;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by tabular storage targets regardless of the file format.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("i/o failure on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Workbook could not be decoded.
    #[error("failed to read {path}: {message}")]
    Read {
        /// File involved.
        path: PathBuf,
        /// Short description of the failure.
        message: String,
        /// Error reported by the spreadsheet library.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Workbook could not be encoded.
    #[error("failed to write {path}: {message}")]
    Write {
        /// File involved.
        path: PathBuf,
        /// Short description of the failure.
        message: String,
        /// Error reported by the spreadsheet library.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Workbook exists but lacks the expected sheet.
    #[error("sheet `{sheet}` not found in {path}")]
    MissingSheet {
        /// Workbook that was opened.
        path: PathBuf,
        /// Sheet that was expected.
        sheet: String,
    },
}

impl StorageError {
    /// Wrap an I/O failure raised while touching `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    /// Construct a read error from any decoder failure.
    pub fn read(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Read {
            path: path.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Construct a write error from any encoder failure.
    pub fn write(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Write {
            path: path.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }
}

/// A single persisted sheet, owned by exactly one writer component.
///
/// Implementations replace the whole sheet on every write; there is no
/// partial update.
pub trait TableTarget: Send + Sync {
    /// Whether the backing file is currently present.
    fn exists(&self) -> bool;
    /// Read the whole sheet, or `None` when the file does not exist.
    fn read_sheet(&self) -> StorageResult<Option<Table>>;
    /// Replace the sheet with `table`.
    fn write_sheet(&self, table: &Table) -> StorageResult<()>;
    /// Delete the backing file. Returns `false` when there was nothing to delete.
    fn remove(&self) -> StorageResult<bool>;
}
