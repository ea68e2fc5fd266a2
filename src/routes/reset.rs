use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::common::ActionResponse,
    error::AppError,
    services::{checkin_service, score_service},
    state::SharedState,
};

/// Endpoints deleting the generated workbooks.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/resetscores", get(reset_scores))
        .route("/resetcheckin", get(reset_checkin))
}

#[utoipa::path(
    get,
    path = "/api/resetscores",
    tag = "reset",
    responses(
        (status = 200, description = "Score workbook deleted or already absent", body = ActionResponse),
        (status = 500, description = "Deletion failed")
    )
)]
/// Delete the score workbook.
pub async fn reset_scores(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(score_service::reset_scores(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/resetcheckin",
    tag = "reset",
    responses(
        (status = 200, description = "Attendance workbook deleted or already absent", body = ActionResponse),
        (status = 500, description = "Deletion failed")
    )
)]
/// Delete the attendance workbook; it is rewritten on the next flush.
pub async fn reset_checkin(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(checkin_service::reset_checkin(&state).await?))
}
