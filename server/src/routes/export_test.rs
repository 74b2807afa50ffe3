use api::{ApiError, Resource};
use axum::http::StatusCode;
use serde_json::json;

use crate::routes::test_support::{authed, send};
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn export_walks_all_pages_into_one_workbook() {
    let (mut state, backend) = test_app_state();
    state.config = std::sync::Arc::new(crate::config::ServerConfig { export_page_size: 2, ..Default::default() });
    backend.seed(
        Resource::Services,
        (1..=5)
            .map(|i| json!({"id": i, "name": format!("Service {i}"), "price": "100.00"}))
            .collect(),
    );

    let reply = send(state, authed("GET", "/api/export/services", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers["content-type"], api::export::XLSX_CONTENT_TYPE);
    let disposition = reply.headers["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"services-"));
    assert!(disposition.ends_with(".xlsx\""));
    assert_eq!(&reply.bytes[..2], b"PK");

    let pages: Vec<_> = backend.calls().into_iter().filter(|c| c.op == "list").collect();
    assert_eq!(pages.len(), 3);
}

#[tokio::test]
async fn export_passes_search_through() {
    let (state, backend) = test_app_state();
    let reply = send(state, authed("GET", "/api/export/customers?search=asha", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(backend.calls()[0].body, json!([["page", "1"], ["limit", "100"], ["search", "asha"]]));
}

#[tokio::test]
async fn export_failure_is_a_toast_not_a_file() {
    let (state, backend) = test_app_state();
    backend.fail_with(|| ApiError::Decode("bad json".into()));
    let reply = send(state, authed("GET", "/api/export/events", None)).await;
    assert_eq!(reply.status, StatusCode::BAD_GATEWAY);
    assert_eq!(reply.json()["success"], false);
}
