//! In-memory [`TableTarget`] used by unit tests to observe writes.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::dao::{
    storage::{StorageError, StorageResult, TableTarget},
    table::Table,
};

/// Sheet held in memory, with a write counter and failure switch.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    table: Mutex<Option<Table>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryTarget {
    /// Target with no sheet yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Target already holding `table`.
    pub fn with_table(table: Table) -> Self {
        let target = Self::default();
        *target.table.lock().unwrap() = Some(table);
        target
    }

    /// Number of successful and failed write attempts so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents, if any.
    pub fn table(&self) -> Option<Table> {
        self.table.lock().unwrap().clone()
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl TableTarget for MemoryTarget {
    fn exists(&self) -> bool {
        self.table.lock().unwrap().is_some()
    }

    fn read_sheet(&self) -> StorageResult<Option<Table>> {
        Ok(self.table())
    }

    fn write_sheet(&self, table: &Table) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::io(
                "memory",
                std::io::Error::other("simulated write failure"),
            ));
        }
        *self.table.lock().unwrap() = Some(table.clone());
        Ok(())
    }

    fn remove(&self) -> StorageResult<bool> {
        Ok(self.table.lock().unwrap().take().is_some())
    }
}
