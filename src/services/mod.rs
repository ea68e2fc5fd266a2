/// Periodic and on-demand persistence of the attendance workbook.
pub mod attendance_writer;
/// Participant lookups, check-in and attendance reset.
pub mod checkin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Startup import of the roster workbook.
pub mod roster_import;
/// Score workbook upsert, listing and deletion.
pub mod score_ledger;
/// Request-level score operations run off the async executor.
pub mod score_service;
