//! Participant lookups and check-in, wiring the roster to the attendance writer.

use tracing::{error, info};

use crate::{
    dto::{
        common::ActionResponse,
        employee::{CheckInResponse, EmployeeDetail, EmployeeListResponse},
    },
    error::ServiceError,
    services::attendance_writer::flush_in_background,
    state::{
        SharedState,
        roster::{CheckInOutcome, RosterFilter},
    },
};

/// Return the full record of one participant.
pub fn get_employee(state: &SharedState, id: &str) -> Result<EmployeeDetail, ServiceError> {
    state.roster().get(id).map(EmployeeDetail::from)
}

/// List participants by check-in status, in import order.
pub fn list_employees(state: &SharedState, filter: RosterFilter) -> EmployeeListResponse {
    state.roster().list_where(filter).into()
}

/// Mark a participant as present.
///
/// A first check-in waits for one attendance flush before answering; write
/// failures are logged by the writer and left to the periodic flush. A repeat
/// check-in touches nothing.
pub async fn check_in(state: &SharedState, id: &str) -> Result<CheckInResponse, ServiceError> {
    match state.roster().check_in(id)? {
        CheckInOutcome::AlreadyCheckedIn => Ok(CheckInResponse {
            success: true,
            already_checked: Some(true),
            message: "Already checked in.".into(),
        }),
        CheckInOutcome::CheckedIn => {
            info!(id = %id.trim(), "participant checked in");
            flush_in_background(state.attendance().clone()).await;
            Ok(CheckInResponse {
                success: true,
                already_checked: None,
                message: "Check-in successful.".into(),
            })
        }
    }
}

/// Delete the attendance workbook. The roster keeps its check-in flags, so
/// the next flush recreates the file.
pub async fn reset_checkin(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    let writer = state.attendance().clone();
    let removed = tokio::task::spawn_blocking(move || writer.reset())
        .await?
        .inspect_err(|err| error!(error = %err, "failed to delete attendance workbook"))?;

    let message = if removed {
        info!("attendance workbook deleted");
        "Check-in file deleted."
    } else {
        "Check-in file not found."
    };
    Ok(ActionResponse::ok(message))
}
