//! Excel download of a whole collection.

use api::backend::fetch_all;
use api::export::{XLSX_CONTENT_TYPE, export_records, file_name};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::routes::auth::Session;
use crate::routes::resources::resource_from_path;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub search: Option<String>,
}

/// `GET /api/export/:resource`: every matching record as an `.xlsx` attachment.
///
/// Pages are fetched one after another with the configured export page size.
pub async fn download(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let resource = resource_from_path(&slug)?;
    let records = fetch_all(
        state.backend.as_ref(),
        &session.creds,
        resource,
        params.search,
        state.config.export_page_size,
    )
    .await?;

    let bytes = export_records(resource.label(), resource.columns(), &records)?;
    let filename = file_name(resource.slug(), chrono::Local::now().date_naive());
    tracing::info!(resource = resource.slug(), rows = records.len(), %filename, "export generated");

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
