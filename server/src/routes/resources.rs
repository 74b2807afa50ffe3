//! Resource CRUD routes.
//!
//! One set of handlers serves every collection in the `Resource`
//! catalogue; the `{resource}` path segment picks the backend collection.
//! Submitted bodies are checked against the typed entity before they are
//! forwarded, so required-field errors never cost a round trip.

use api::models::AppointmentStatus;
use api::{ApiError, PageQuery, Resource};
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::ack_response;
use crate::routes::auth::Session;
use crate::state::AppState;

/// Raw query string values; parsed leniently by [`PageQuery::from_raw`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn page_query(&self) -> PageQuery {
        PageQuery::from_raw(self.page.as_deref(), self.limit.as_deref(), self.search.as_deref())
    }
}

pub(crate) fn resource_from_path(slug: &str) -> Result<Resource, AppError> {
    Resource::from_slug(slug).ok_or_else(|| AppError::unknown("resource", slug))
}

fn writable(resource: Resource) -> Result<Resource, AppError> {
    if resource.read_only() {
        return Err(ApiError::ReadOnly(resource.label()).into());
    }
    Ok(resource)
}

/// `GET /api/resources/:resource`: one page of a collection.
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, AppError> {
    let resource = resource_from_path(&slug)?;
    let query = params.page_query();
    let page = state.backend.list(&session.creds, resource, &query).await?;

    Ok(Json(json!({
        "success": true,
        "records": page.records,
        "totalRecords": page.total_records,
        "totalPages": page.total_pages,
        "page": query.page,
        "limit": query.limit,
    })))
}

/// `GET /api/resources/:resource/:id`: a single record.
pub async fn fetch(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let resource = resource_from_path(&slug)?;
    let data = state.backend.fetch(&session.creds, resource, &id).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// `POST /api/resources/:resource`: create a record.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let resource = writable(resource_from_path(&slug)?)?;
    resource.validate_body(&body).map_err(ApiError::from)?;

    let ack = state.backend.create(&session.creds, resource, &body).await?;
    tracing::info!(resource = resource.slug(), user_id = %session.creds.user_id, "record created");
    Ok(ack_response(ack))
}

/// `PUT /api/resources/:resource/:id`: replace a record.
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let resource = writable(resource_from_path(&slug)?)?;
    resource.validate_body(&body).map_err(ApiError::from)?;

    let ack = state.backend.update(&session.creds, resource, &id, &body).await?;
    tracing::info!(resource = resource.slug(), %id, "record updated");
    Ok(ack_response(ack))
}

/// `DELETE /api/resources/:resource/:id`.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let resource = writable(resource_from_path(&slug)?)?;
    let ack = state.backend.delete(&session.creds, resource, &id).await?;
    tracing::info!(resource = resource.slug(), %id, "record deleted");
    Ok(ack_response(ack))
}

#[derive(Deserialize)]
pub struct StatusBody {
    #[serde(default)]
    status: String,
}

/// `PUT /api/appointments/:id/status`: move an appointment through its lifecycle.
pub async fn update_appointment_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Value>, AppError> {
    let Some(status) = AppointmentStatus::from_str(&body.status) else {
        return Err(AppError::BadRequest(format!("Unknown appointment status: {}", body.status.trim())));
    };
    let ack = state
        .backend
        .update_appointment_status(&session.creds, &id, status)
        .await?;
    tracing::info!(%id, %status, "appointment status changed");
    Ok(ack_response(ack))
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
