use axum::http::StatusCode;
use serde_json::json;

use super::*;
use crate::routes::test_support::{anonymous, send};
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn healthz_needs_no_session() {
    let (state, _) = test_app_state();
    let reply = send(state, anonymous("GET", "/healthz", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (state, _) = test_app_state();
    let reply = send(state, anonymous("GET", "/api/nothing-here", None)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[test]
fn ack_response_omits_missing_data() {
    let Json(body) = ack_response(Ack { message: "Saved".into(), data: None });
    assert_eq!(body, json!({"success": true, "message": "Saved"}));

    let Json(body) = ack_response(Ack { message: "Saved".into(), data: Some(json!({"id": 5})) });
    assert_eq!(body["data"]["id"], 5);
}
