//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway sits between the dashboard front end and the remote PHP API.
//! Every `/api` route reads the caller's cookies, forwards one call through
//! `AppState::backend`, and answers with the same `{success, message, ...}`
//! envelope the backend speaks. Failures are rendered by `AppError`.

pub mod auth;
pub mod checkout;
pub mod dashboard;
pub mod export;
pub mod resources;
pub mod settings;
pub mod uploads;

use api::Ack;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use serde_json::{Value, json};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Multipart framing on top of the file itself.
const UPLOAD_ENVELOPE_SLACK: usize = 64 * 1024;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + UPLOAD_ENVELOPE_SLACK);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/resources/{resource}", get(resources::list).post(resources::create))
        .route(
            "/api/resources/{resource}/{id}",
            get(resources::fetch)
                .put(resources::update)
                .delete(resources::delete),
        )
        .route("/api/appointments/{id}/status", put(resources::update_appointment_status))
        .route("/api/settings/{kind}", get(settings::show).put(settings::save))
        .route("/api/uploads/{feature}", post(uploads::upload).layer(upload_limit))
        .route("/api/export/{resource}", get(export::download))
        .route("/api/checkout/quote", post(checkout::quote))
        .route("/api/dashboard", get(dashboard::summary))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Success envelope for a mutation.
pub(crate) fn ack_response(ack: Ack) -> Json<Value> {
    let mut body = json!({ "success": true, "message": ack.message });
    if let Some(data) = ack.data {
        body["data"] = data;
    }
    Json(body)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
