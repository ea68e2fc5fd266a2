//! Library crate for checkin-back, exposing modules for binaries and integration tests.

pub mod config;
/// Spreadsheet-backed storage targets.
pub mod dao;
/// Request and response bodies.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
pub mod routes;
/// Import, persistence and request-level services.
pub mod services;
pub mod state;
