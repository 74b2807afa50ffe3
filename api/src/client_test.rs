use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, Method as HttpMethod, StatusCode as HttpStatus, Uri};
use axum::routing::post;
use serde_json::{Value, json};

use super::*;
use crate::backend::fetch_all;

// =============================================================================
// FAKE BACKEND
// =============================================================================

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    query: HashMap<String, String>,
    auth: Option<String>,
    body: Value,
}

type Responder = fn(&Seen) -> (HttpStatus, String);

#[derive(Clone)]
struct Fake {
    log: Arc<Mutex<Vec<Seen>>>,
    respond: Responder,
}

async fn record(
    State(fake): State<Fake>,
    method: HttpMethod,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (HttpStatus, String) {
    let seen = Seen {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query,
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let reply = (fake.respond)(&seen);
    fake.log.lock().unwrap().push(seen);
    reply
}

async fn upload_script(
    Path(script): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> String {
    let field = multipart.next_field().await.unwrap().unwrap();
    let name = field.name().unwrap_or_default().to_owned();
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().unwrap_or_default().to_owned();
    let bytes = field.bytes().await.unwrap();
    let user_id = query.get("user_id").cloned().unwrap_or_default();
    let echo = format!("{script}|{user_id}|{name}|{content_type}|{}|{file_name}", bytes.len());
    json!({"success": true, "data": {"filename": echo}}).to_string()
}

async fn spawn(respond: Responder) -> (ApiClient, Arc<Mutex<Vec<Seen>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let fake = Fake { log: log.clone(), respond };
    let router = Router::new()
        .route("/uploads/{script}", post(upload_script))
        .fallback(record)
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = ApiClient::new(&ApiConfig::new(&format!("http://{addr}"))).unwrap();
    (client, log)
}

fn ok(body: Value) -> (HttpStatus, String) {
    (HttpStatus::OK, body.to_string())
}

fn creds() -> Credentials {
    Credentials::new("t1", "u1")
}

fn calls(log: &Arc<Mutex<Vec<Seen>>>) -> Vec<Seen> {
    log.lock().unwrap().clone()
}

// =============================================================================
// LIST / FETCH
// =============================================================================

#[tokio::test]
async fn list_sends_credentials_and_paging() {
    let (client, log) = spawn(|_| {
        ok(json!({"success": true, "records": [{"id": 1}, {"id": 2}], "totalRecords": "12", "totalPages": 2}))
    })
    .await;

    let query = PageQuery::new(2, 5).with_search(Some(" asha ".into()));
    let page = client.list(&creds(), Resource::Customers, &query).await.unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.total_records, 12);
    assert_eq!(page.total_pages, 2);

    let seen = calls(&log);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/customers");
    assert_eq!(seen[0].auth.as_deref(), Some("Bearer t1"));
    assert_eq!(seen[0].query.get("user_id").map(String::as_str), Some("u1"));
    assert_eq!(seen[0].query.get("page").map(String::as_str), Some("2"));
    assert_eq!(seen[0].query.get("limit").map(String::as_str), Some("5"));
    assert_eq!(seen[0].query.get("search").map(String::as_str), Some("asha"));
}

#[tokio::test]
async fn list_without_records_is_empty_page() {
    let (client, _) = spawn(|_| ok(json!({"success": true}))).await;
    let page = client
        .list(&creds(), Resource::PaymentMethods, &PageQuery::default())
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn fetch_returns_data_and_uses_remote_path() {
    let (client, log) = spawn(|_| ok(json!({"success": true, "data": {"id": "9", "name": "UPI"}}))).await;
    let record = client
        .fetch(&creds(), Resource::PaymentMethods, "9")
        .await
        .unwrap();
    assert_eq!(record["name"], "UPI");
    assert_eq!(calls(&log)[0].path, "/manual-payment-methods/9");
}

#[tokio::test]
async fn fetch_all_walks_every_page() {
    let (client, log) = spawn(|seen| match seen.query.get("page").map(String::as_str) {
        Some("1") => ok(json!({"success": true, "records": [{"id": 1}, {"id": 2}], "totalPages": 2})),
        _ => ok(json!({"success": true, "records": [{"id": 3}], "totalPages": 2})),
    })
    .await;

    let records = fetch_all(&client, &creds(), Resource::Services, None, 2)
        .await
        .unwrap();
    let ids: Vec<_> = records.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(calls(&log).len(), 2);
}

// =============================================================================
// WRITES
// =============================================================================

#[tokio::test]
async fn create_posts_body_and_returns_message() {
    let (client, log) = spawn(|_| ok(json!({"success": true, "message": "Customer added", "data": {"id": 5}}))).await;
    let body = json!({"name": "Asha", "phone": "98450"});
    let ack = client
        .create(&creds(), Resource::Customers, &body)
        .await
        .unwrap();
    assert_eq!(ack.message, "Customer added");
    assert_eq!(ack.data, Some(json!({"id": 5})));

    let seen = calls(&log);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].body, body);
}

#[tokio::test]
async fn delete_targets_the_record_segment() {
    let (client, log) = spawn(|_| ok(json!({"success": true}))).await;
    let ack = client
        .delete(&creds(), Resource::Services, " 7 ")
        .await
        .unwrap();
    assert_eq!(ack.message, "Saved");
    let seen = calls(&log);
    assert_eq!(seen[0].method, "DELETE");
    assert_eq!(seen[0].path, "/services/7");
}

#[tokio::test]
async fn malformed_ids_never_reach_the_backend() {
    let (client, log) = spawn(|_| ok(json!({"success": true}))).await;

    for id in ["!!", "", "   ", "../7", "7/edit", "7?x=1"] {
        let err = client
            .delete(&creds(), Resource::Services, id)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::InvalidId(raw) if raw == id), "{id:?}: {err:?}");
    }
    let err = client
        .fetch(&creds(), Resource::Customers, "1 2")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_ID");
    let err = client
        .update(&creds(), Resource::Customers, "..", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_ID");
    let err = client
        .update_appointment_status(&creds(), "", AppointmentStatus::Confirmed)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_ID");

    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn appointment_status_is_a_put_on_status_path() {
    let (client, log) = spawn(|_| ok(json!({"success": true, "message": "Status updated"}))).await;
    client
        .update_appointment_status(&creds(), "a-7", AppointmentStatus::Confirmed)
        .await
        .unwrap();
    let seen = calls(&log);
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].path, "/appointments/a-7/status");
    assert_eq!(seen[0].body, json!({"status": "confirmed"}));
}

#[tokio::test]
async fn read_only_resources_never_reach_the_backend() {
    let (client, log) = spawn(|_| ok(json!({"success": true}))).await;
    let err = client
        .create(&creds(), Resource::Plans, &json!({"name": "Gold"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ReadOnly(_)));
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn settings_round_trip_paths() {
    let (client, log) = spawn(|seen| {
        if seen.method == "GET" {
            ok(json!({"success": true, "data": {"business_name": "Glow"}}))
        } else {
            ok(json!({"success": true, "message": "Settings saved"}))
        }
    })
    .await;

    let site = client.settings(&creds(), SettingsKind::Site).await.unwrap();
    assert_eq!(site["business_name"], "Glow");
    let ack = client
        .save_settings(&creds(), SettingsKind::Website, &json!({"hero_title": "Hi"}))
        .await
        .unwrap();
    assert_eq!(ack.message, "Settings saved");

    let seen = calls(&log);
    assert_eq!(seen[0].path, "/site-settings");
    assert_eq!(seen[1].path, "/website-settings");
    assert_eq!(seen[1].method, "PUT");
}

// =============================================================================
// ERRORS
// =============================================================================

#[tokio::test]
async fn success_false_surfaces_remote_message() {
    let (client, _) = spawn(|_| ok(json!({"success": false, "message": "Phone already registered"}))).await;
    let err = client
        .create(&creds(), Resource::Customers, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::Rejected(m) if m == "Phone already registered"));
    assert_eq!(err.user_message(), "Phone already registered");
}

#[tokio::test]
async fn error_status_with_envelope_is_a_rejection() {
    let (client, _) = spawn(|_| {
        (HttpStatus::UNPROCESSABLE_ENTITY, json!({"success": false, "message": "Code taken"}).to_string())
    })
    .await;
    let err = client
        .create(&creds(), Resource::Coupons, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected(m) if m == "Code taken"));
}

#[tokio::test]
async fn error_status_without_envelope_keeps_status() {
    let (client, _) = spawn(|_| (HttpStatus::INTERNAL_SERVER_ERROR, "<h1>Fatal error</h1>".into())).await;
    let err = client
        .list(&creds(), Resource::Events, &PageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized() {
    let (client, _) = spawn(|_| (HttpStatus::UNAUTHORIZED, json!({"success": false}).to_string())).await;
    let err = client
        .settings(&creds(), SettingsKind::Payment)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let (client, _) = spawn(|_| (HttpStatus::OK, "Warning: mysqli_connect()".into())).await;
    let err = client
        .fetch(&creds(), Resource::Customers, "1")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "E_DECODE");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&ApiConfig::new(&format!("http://{addr}"))).unwrap();
    let err = client.login("98450", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

// =============================================================================
// LOGIN / UPLOAD
// =============================================================================

#[tokio::test]
async fn login_reads_token_and_user_from_data() {
    let (client, log) = spawn(|_| {
        ok(json!({"success": true, "data": {"token": "abc", "user": {"id": 42, "name": "Asha", "phone": "98450"}}}))
    })
    .await;

    let session = client.login(" 98450 ", "secret").await.unwrap();
    assert_eq!(session.token, "abc");
    assert_eq!(session.user.id, "42");
    assert_eq!(session.credentials(), Credentials::new("abc", "42"));

    let seen = calls(&log);
    assert_eq!(seen[0].path, "/auth/login");
    assert!(seen[0].auth.is_none());
    assert_eq!(seen[0].body, json!({"phone": "98450", "password": "secret"}));
}

#[tokio::test]
async fn login_reads_top_level_token() {
    let (client, _) = spawn(|_| ok(json!({"success": true, "token": "xyz", "user": {"id": "7", "name": "Ravi"}}))).await;
    let session = client.login("1", "2").await.unwrap();
    assert_eq!(session.token, "xyz");
    assert_eq!(session.user.name, "Ravi");
}

#[tokio::test]
async fn login_without_token_is_decode_error() {
    let (client, _) = spawn(|_| ok(json!({"success": true, "user": {"id": "7"}}))).await;
    let err = client.login("1", "2").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(m) if m.contains("token")));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (client, _) = spawn(|_| ok(json!({"success": false, "message": "Invalid phone or password"}))).await;
    let err = client.login("1", "2").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid phone or password");
}

#[tokio::test]
async fn refused_login_keeps_remote_message() {
    let (client, _) = spawn(|_| {
        (HttpStatus::UNAUTHORIZED, json!({"success": false, "message": "Invalid phone or password"}).to_string())
    })
    .await;
    let err = client.login("1", "2").await.unwrap_err();
    assert!(matches!(&err, ApiError::Rejected(m) if m == "Invalid phone or password"));
    assert_eq!(err.user_message(), "Invalid phone or password");
}

#[tokio::test]
async fn refused_login_without_message_is_unauthorized() {
    let (client, _) = spawn(|_| (HttpStatus::FORBIDDEN, "denied".into())).await;
    let err = client.login("1", "2").await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn refused_session_ignores_remote_message() {
    let (client, _) = spawn(|_| {
        (HttpStatus::UNAUTHORIZED, json!({"success": false, "message": "Token expired"}).to_string())
    })
    .await;
    let err = client
        .list(&creds(), Resource::Customers, &PageQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let (client, _) = spawn(|_| ok(json!({"success": false}))).await;
    let file = FileUpload::new("logo.png", None, vec![1, 2, 3]);
    let filename = client
        .upload(&creds(), UploadFeature::Logo, file)
        .await
        .unwrap();
    assert_eq!(filename, "upload_logo.php|u1|file|image/png|3|logo.png");
}
