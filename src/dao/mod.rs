/// In-memory storage target for tests.
#[cfg(test)]
pub mod memory;
/// Storage abstraction over a single persisted sheet.
pub mod storage;
/// Cell and table model shared by every workbook.
pub mod table;
/// Excel workbook storage target.
pub mod xlsx;
