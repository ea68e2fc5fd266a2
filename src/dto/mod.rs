/// Bodies shared across endpoints.
pub mod common;
/// Participant and check-in bodies.
pub mod employee;
/// Score submission and listing bodies.
pub mod score;
/// Custom validators used by request bodies.
pub mod validation;
