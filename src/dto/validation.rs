//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a score submission carries at least one of its two groups.
///
/// # Examples
///
/// ```ignore
/// validate_score_groups(true, false)  // Ok
/// validate_score_groups(false, false) // Err - nothing to record
/// ```
pub fn validate_score_groups(has_part1: bool, has_part2: bool) -> Result<(), ValidationError> {
    if has_part1 || has_part2 {
        return Ok(());
    }

    let mut err = ValidationError::new("score_groups_missing");
    err.message = Some("Missing part1 or part2 score data".into());
    Err(err)
}
