use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::score::{ScoreListResponse, ScoreSubmissionRequest, ScoreSubmitResponse},
    error::AppError,
    services::score_service,
    state::SharedState,
};

/// Judge score submission and the score listing.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/score/{team_id}/{judge_id}", post(submit_score))
        .route("/scores", get(list_scores))
}

#[utoipa::path(
    post,
    path = "/api/score/{team_id}/{judge_id}",
    tag = "scores",
    params(
        ("team_id" = String, Path, description = "Team identifier"),
        ("judge_id" = String, Path, description = "Judge identifier")
    ),
    request_body = ScoreSubmissionRequest,
    responses(
        (status = 200, description = "Score stored", body = ScoreSubmitResponse),
        (status = 400, description = "Malformed body or no score group"),
        (status = 409, description = "Another submission is being saved"),
        (status = 500, description = "Score workbook could not be written")
    )
)]
/// Insert or replace the scores one judge gave one team.
pub async fn submit_score(
    State(state): State<SharedState>,
    Path((team_id, judge_id)): Path<(String, String)>,
    payload: Result<Json<ScoreSubmissionRequest>, JsonRejection>,
) -> Result<Json<ScoreSubmitResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let response = score_service::submit_score(&state, team_id, judge_id, &request).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/scores",
    tag = "scores",
    responses(
        (status = 200, description = "Every stored score row", body = ScoreListResponse),
        (status = 500, description = "Score workbook could not be read")
    )
)]
/// Return every stored score row.
pub async fn list_scores(
    State(state): State<SharedState>,
) -> Result<Json<ScoreListResponse>, AppError> {
    Ok(Json(score_service::list_scores(&state).await?))
}
