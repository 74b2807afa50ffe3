//! Settings document routes: site, website content, payment providers.

use api::{ApiError, SettingsKind};
use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::ack_response;
use crate::routes::auth::Session;
use crate::state::AppState;

fn kind_from_path(slug: &str) -> Result<SettingsKind, AppError> {
    SettingsKind::from_slug(slug).ok_or_else(|| AppError::unknown("settings", slug))
}

/// `GET /api/settings/:kind`: stored document, payment secrets masked.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    let kind = kind_from_path(&slug)?;
    let stored = state.backend.settings(&session.creds, kind).await?;
    Ok(Json(json!({ "success": true, "data": kind.present(stored) })))
}

/// `PUT /api/settings/:kind`: validate and save a document.
///
/// A secret still carrying the display mask counts as present for
/// validation and is left out of the save, keeping the stored value.
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let kind = kind_from_path(&slug)?;
    kind.validate_body(&body).map_err(ApiError::from)?;
    let body = kind.prepare(body);

    let ack = state.backend.save_settings(&session.creds, kind, &body).await?;
    tracing::info!(settings = kind.slug(), user_id = %session.creds.user_id, "settings saved");
    Ok(ack_response(ack))
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
