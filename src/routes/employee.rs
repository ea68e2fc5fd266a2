use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::employee::{CheckInResponse, EmployeeListResponse, EmployeeResponse},
    error::AppError,
    services::checkin_service,
    state::{SharedState, roster::RosterFilter},
};

/// Participant lookups and the check-in endpoint.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/employees/{id}", get(get_employee))
        .route("/employee/unchecked", get(list_unchecked))
        .route("/employee/checked", get(list_checked))
        .route("/checkin/{id}", get(check_in))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Participant identifier, case-insensitive")),
    responses(
        (status = 200, description = "Participant record", body = EmployeeResponse),
        (status = 404, description = "Unknown participant")
    )
)]
/// Return one participant, including whether they already checked in.
pub async fn get_employee(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let data = checkin_service::get_employee(&state, &id)?;
    Ok(Json(EmployeeResponse {
        success: true,
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/employee/unchecked",
    tag = "employees",
    responses((status = 200, description = "Participants not checked in yet", body = EmployeeListResponse))
)]
/// List participants who have not checked in.
pub async fn list_unchecked(State(state): State<SharedState>) -> Json<EmployeeListResponse> {
    Json(checkin_service::list_employees(
        &state,
        RosterFilter::Unchecked,
    ))
}

#[utoipa::path(
    get,
    path = "/api/employee/checked",
    tag = "employees",
    responses((status = 200, description = "Participants already checked in", body = EmployeeListResponse))
)]
/// List participants who already checked in.
pub async fn list_checked(State(state): State<SharedState>) -> Json<EmployeeListResponse> {
    Json(checkin_service::list_employees(&state, RosterFilter::Checked))
}

#[utoipa::path(
    get,
    path = "/api/checkin/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Participant identifier, case-insensitive")),
    responses(
        (status = 200, description = "Checked in, or already checked in", body = CheckInResponse),
        (status = 400, description = "Unknown participant")
    )
)]
/// Check a participant in and persist the attendance workbook.
pub async fn check_in(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CheckInResponse>, AppError> {
    Ok(Json(checkin_service::check_in(&state, &id).await?))
}
