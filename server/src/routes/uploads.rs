//! File upload relay.
//!
//! The browser posts a multipart form with a single `file` field; the file
//! is checked here and forwarded to the backend script for the feature.

use api::ApiError;
use api::upload::{FileUpload, UploadFeature};
use axum::extract::{Multipart, Path, State};
use axum::response::Json;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::auth::Session;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// `POST /api/uploads/:feature`: store an image and return its path.
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let feature = UploadFeature::from_slug(&slug).ok_or_else(|| AppError::unknown("upload feature", &slug))?;

    let file = read_file_field(&mut multipart).await?;
    file.validate(state.config.max_upload_bytes)?;

    let filename = state.backend.upload(&session.creds, feature, file).await?;
    Ok(Json(json!({ "success": true, "message": "File uploaded", "filename": filename })))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<FileUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(invalid_multipart)?;
        return Ok(FileUpload::new(&file_name, content_type.as_deref(), bytes.to_vec()));
    }
    Err(ApiError::InvalidUpload("no file was attached".into()).into())
}

fn invalid_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    ApiError::InvalidUpload(err.body_text()).into()
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
