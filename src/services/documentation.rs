//! OpenAPI document served by Swagger UI and printed by `openapi-generator`.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the check-in back end.
#[openapi(
    paths(
        crate::routes::employee::get_employee,
        crate::routes::employee::list_unchecked,
        crate::routes::employee::list_checked,
        crate::routes::employee::check_in,
        crate::routes::score::submit_score,
        crate::routes::score::list_scores,
        crate::routes::reset::reset_scores,
        crate::routes::reset::reset_checkin,
    ),
    components(
        schemas(
            crate::dto::common::ActionResponse,
            crate::dto::employee::EmployeeDetail,
            crate::dto::employee::EmployeeResponse,
            crate::dto::employee::EmployeeSummary,
            crate::dto::employee::EmployeeListResponse,
            crate::dto::employee::CheckInResponse,
            crate::dto::score::ContentScores,
            crate::dto::score::DeliveryScores,
            crate::dto::score::ScoreSubmissionRequest,
            crate::dto::score::ScoreRowDto,
            crate::dto::score::ScoreSubmitResponse,
            crate::dto::score::ScoreListResponse,
        )
    ),
    tags(
        (name = "employees", description = "Participant lookups and check-in"),
        (name = "scores", description = "Judge score submission and listing"),
        (name = "reset", description = "Deletion of generated workbooks"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_api_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/employees/{id}",
            "/api/employee/unchecked",
            "/api/employee/checked",
            "/api/checkin/{id}",
            "/api/score/{team_id}/{judge_id}",
            "/api/scores",
            "/api/resetscores",
            "/api/resetcheckin",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
