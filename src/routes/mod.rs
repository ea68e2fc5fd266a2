//! HTTP routes, all JSON endpoints nested under `/api`.

use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// Participant and check-in routes.
pub mod employee;
/// Workbook reset routes.
pub mod reset;
/// Score routes.
pub mod score;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = employee::router()
        .merge(score::router())
        .merge(reset::router());

    let docs_router = docs::router(state.clone());

    Router::new()
        .nest("/api", api_router)
        .merge(docs_router)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::router;
    use crate::{
        config::AppConfig,
        dao::{memory::MemoryTarget, storage::TableTarget},
        state::{AppState, SharedState, roster::tests::seeded_store},
    };

    struct Harness {
        state: SharedState,
        attendance: Arc<MemoryTarget>,
        scores: Arc<MemoryTarget>,
    }

    fn harness() -> Harness {
        let attendance = Arc::new(MemoryTarget::new());
        let scores = Arc::new(MemoryTarget::new());
        let state = AppState::with_targets(
            AppConfig::default(),
            Arc::new(seeded_store()),
            attendance.clone(),
            scores.clone(),
        );
        Harness {
            state,
            attendance,
            scores,
        }
    }

    async fn send(state: &SharedState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(state: &SharedState, uri: &str) -> (StatusCode, Value) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(state: &SharedState, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        send(state, request).await
    }

    #[tokio::test]
    async fn check_in_is_idempotent_and_flushes_once() {
        let h = harness();

        let (status, body) = get(&h.state, "/api/checkin/a001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body.get("alreadyChecked").is_none());
        assert_eq!(h.attendance.writes(), 1);

        let (status, body) = get(&h.state, "/api/employees/A001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["checkedIn"], true);
        assert_eq!(body["data"]["name"], "Lan");
        assert_eq!(body["data"]["phone"], 912345678);

        let (status, body) = get(&h.state, "/api/checkin/A001").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alreadyChecked"], true);
        assert_eq!(h.attendance.writes(), 1);

        let table = h.attendance.table().unwrap();
        assert_eq!(table.data_rows().len(), 3);
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let h = harness();

        let (status, body) = get(&h.state, "/api/checkin/Z999").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(h.attendance.writes(), 0);

        let (status, body) = get(&h.state, "/api/employees/Z999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn listings_split_by_check_in_status() {
        let h = harness();
        get(&h.state, "/api/checkin/b002").await;

        let (_, checked) = get(&h.state, "/api/employee/checked").await;
        assert_eq!(checked["count"], 1);
        assert_eq!(checked["data"][0]["id"], "B002");
        assert!(checked["data"][0].get("checkedIn").is_none());

        let (_, unchecked) = get(&h.state, "/api/employee/unchecked").await;
        assert_eq!(unchecked["count"], 2);
        let ids: Vec<&str> = unchecked["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["A001", "C003"]);
    }

    #[tokio::test]
    async fn score_resubmission_replaces_the_row() {
        let h = harness();
        let full = json!({
            "part1": {"understanding": 8, "logic": 7, "expression": 9, "expression1": 6},
            "part2": {"teamwork": 5, "creativity": 4, "completion": 5}
        });

        let (status, body) = post_json(&h.state, "/api/score/T1/J1", &full.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], "44.00");
        assert_eq!(body["data"]["teamId"], "T1");

        let delivery = json!({"part2": {"teamwork": 10, "creativity": 10, "completion": 10}});
        let (status, body) = post_json(&h.state, "/api/score/T1/J1", &delivery.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], "60.00");
        assert_eq!(body["data"]["understanding"], 8);

        let (status, body) = get(&h.state, "/api/scores").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Team"], "T1");
        assert_eq!(rows[0]["Total"], "60.00");
    }

    #[tokio::test]
    async fn score_without_groups_or_json_is_a_bad_request() {
        let h = harness();

        let (status, body) = post_json(&h.state, "/api/score/T1/J1", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = post_json(&h.state, "/api/score/T1/J1", "not-json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(h.scores.writes(), 0);
    }

    #[tokio::test]
    async fn negative_sub_scores_are_stored_as_sent() {
        let h = harness();

        let body = json!({"part2": {"teamwork": -3}});
        let (status, body) = post_json(&h.state, "/api/score/T1/J1", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["teamwork"], -3);
        assert_eq!(body["data"]["total"], "-3.00");
        assert_eq!(h.scores.writes(), 1);
    }

    #[tokio::test]
    async fn score_write_failure_is_a_server_error() {
        let h = harness();
        h.scores.fail_writes(true);

        let body = json!({"part1": {"understanding": 1}});
        let (status, body) = post_json(&h.state, "/api/score/T1/J1", &body.to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn resets_report_missing_files_without_failing() {
        let h = harness();

        let (status, body) = get(&h.state, "/api/resetscores").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Score file not found.");

        let (_, body) = get(&h.state, "/api/scores").await;
        assert_eq!(body["data"], json!([]));

        let (_, body) = get(&h.state, "/api/resetcheckin").await;
        assert_eq!(body["message"], "Check-in file not found.");
    }

    #[tokio::test]
    async fn resets_delete_existing_files() {
        let h = harness();
        get(&h.state, "/api/checkin/C003").await;
        let body = json!({"part1": {"logic": 3}});
        post_json(&h.state, "/api/score/T2/J1", &body.to_string()).await;

        let (_, body) = get(&h.state, "/api/resetscores").await;
        assert_eq!(body["message"], "Score file deleted.");
        assert!(!h.scores.exists());

        let (_, body) = get(&h.state, "/api/resetcheckin").await;
        assert_eq!(body["message"], "Check-in file deleted.");
        assert!(!h.attendance.exists());

        let (_, body) = get(&h.state, "/api/employees/c003").await;
        assert_eq!(body["data"]["checkedIn"], true);
    }
}
