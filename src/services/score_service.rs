//! Score submission, listing and reset on top of the [`ScoreLedger`](crate::services::score_ledger::ScoreLedger).

use tracing::{error, info};

use crate::{
    dto::{
        common::ActionResponse,
        score::{ScoreListResponse, ScoreSubmissionRequest, ScoreSubmitResponse},
    },
    error::ServiceError,
    services::score_ledger::ScoreSubmission,
    state::SharedState,
};

/// Record one judge's scores for one team, replacing any earlier submission.
pub async fn submit_score(
    state: &SharedState,
    team_id: String,
    judge_id: String,
    request: &ScoreSubmissionRequest,
) -> Result<ScoreSubmitResponse, ServiceError> {
    let submission = ScoreSubmission::from(request);
    let ledger = state.scores().clone();
    let row =
        tokio::task::spawn_blocking(move || ledger.upsert(&team_id, &judge_id, &submission))
            .await??;

    Ok(ScoreSubmitResponse {
        success: true,
        message: "Score saved.".into(),
        data: row.into(),
    })
}

/// Return every stored score row.
pub async fn list_scores(state: &SharedState) -> Result<ScoreListResponse, ServiceError> {
    let ledger = state.scores().clone();
    let rows = tokio::task::spawn_blocking(move || ledger.list())
        .await?
        .inspect_err(|err| error!(error = %err, "failed to read score workbook"))?;

    Ok(ScoreListResponse {
        success: true,
        data: rows,
    })
}

/// Delete the score workbook.
pub async fn reset_scores(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    let ledger = state.scores().clone();
    let removed = tokio::task::spawn_blocking(move || ledger.reset())
        .await?
        .inspect_err(|err| error!(error = %err, "failed to delete score workbook"))?;

    let message = if removed {
        info!("score workbook deleted");
        "Score file deleted."
    } else {
        "Score file not found."
    };
    Ok(ActionResponse::ok(message))
}
