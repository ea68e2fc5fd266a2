//! DTO definitions for score submission and the score listing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::table::Cell,
    dto::validation::validate_score_groups,
    services::score_ledger::{ScoreRow, ScoreSubmission},
};

/// Content dimensions of a score submission.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContentScores {
    /// Understanding of the topic.
    pub understanding: Option<f64>,
    /// Logic of the argument.
    pub logic: Option<f64>,
    /// Expression, first criterion.
    pub expression: Option<f64>,
    /// Expression, second criterion.
    pub expression1: Option<f64>,
}

/// Delivery dimensions of a score submission.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeliveryScores {
    /// Teamwork.
    pub teamwork: Option<f64>,
    /// Creativity.
    pub creativity: Option<f64>,
    /// Completion.
    pub completion: Option<f64>,
}

/// Body of `POST /score/{teamId}/{judgeId}`.
///
/// Omitted or `null` fields keep the value stored by an earlier submission.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScoreSubmissionRequest {
    /// Content scores, if sent.
    pub part1: Option<ContentScores>,
    /// Delivery scores, if sent.
    pub part2: Option<DeliveryScores>,
}

impl Validate for ScoreSubmissionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_score_groups(self.part1.is_some(), self.part2.is_some()) {
            errors.add("part1", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&ScoreSubmissionRequest> for ScoreSubmission {
    fn from(request: &ScoreSubmissionRequest) -> Self {
        let content = request.part1.as_ref();
        let delivery = request.part2.as_ref();
        Self {
            understanding: content.and_then(|part| part.understanding),
            logic: content.and_then(|part| part.logic),
            expression: content.and_then(|part| part.expression),
            expression1: content.and_then(|part| part.expression1),
            teamwork: delivery.and_then(|part| part.teamwork),
            creativity: delivery.and_then(|part| part.creativity),
            completion: delivery.and_then(|part| part.completion),
        }
    }
}

/// Stored score row after an upsert.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRowDto {
    /// Team the scores are for.
    pub team_id: String,
    /// Judge who gave them.
    pub judge_id: String,
    /// Understanding sub-score.
    #[schema(value_type = Value)]
    pub understanding: Cell,
    /// Logic sub-score.
    #[schema(value_type = Value)]
    pub logic: Cell,
    /// First expression sub-score.
    #[schema(value_type = Value)]
    pub expression: Cell,
    /// Second expression sub-score.
    #[schema(value_type = Value)]
    pub expression1: Cell,
    /// Teamwork sub-score.
    #[schema(value_type = Value)]
    pub teamwork: Cell,
    /// Creativity sub-score.
    #[schema(value_type = Value)]
    pub creativity: Cell,
    /// Completion sub-score.
    #[schema(value_type = Value)]
    pub completion: Cell,
    /// Sum of the seven sub-scores with two decimals.
    pub total: String,
    /// Submission time, `HH:MM:SS DD/MM/YYYY`.
    pub submitted_at: String,
}

impl From<ScoreRow> for ScoreRowDto {
    fn from(row: ScoreRow) -> Self {
        let [
            understanding,
            logic,
            expression,
            expression1,
            teamwork,
            creativity,
            completion,
        ] = row.sub_scores;
        Self {
            team_id: row.team_id,
            judge_id: row.judge_id,
            understanding,
            logic,
            expression,
            expression1,
            teamwork,
            creativity,
            completion,
            total: row.total,
            submitted_at: row.submitted_at,
        }
    }
}

/// Body of `POST /score/{teamId}/{judgeId}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreSubmitResponse {
    /// `true` on every successful response.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The row now stored for the pair.
    pub data: ScoreRowDto,
}

/// Every stored score row keyed by the sheet's header labels.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreListResponse {
    /// `true` on every successful response.
    pub success: bool,
    /// Rows in sheet order; blank cells are empty strings.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<IndexMap<String, Cell>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ScoreSubmissionRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn request_without_groups_is_rejected() {
        assert!(parse("{}").validate().is_err());
        assert!(parse(r#"{"part1": null, "part2": null}"#).validate().is_err());
        assert!(parse(r#"{"part1": {}}"#).validate().is_ok());
    }

    #[test]
    fn any_numeric_sub_score_is_accepted() {
        let request = parse(r#"{"part2": {"teamwork": -3, "creativity": 12.5}}"#);
        assert!(request.validate().is_ok());
        assert_eq!(ScoreSubmission::from(&request).teamwork, Some(-3.0));
    }

    #[test]
    fn groups_flatten_into_submission() {
        let request = parse(
            r#"{"part1": {"understanding": 8, "logic": null}, "part2": {"completion": 5.5}}"#,
        );
        let submission = ScoreSubmission::from(&request);

        assert_eq!(submission.understanding, Some(8.0));
        assert_eq!(submission.logic, None);
        assert_eq!(submission.expression1, None);
        assert_eq!(submission.teamwork, None);
        assert_eq!(submission.completion, Some(5.5));
    }
}
