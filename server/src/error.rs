//! Gateway error type and its JSON rendering.
//!
//! Every failure leaves the gateway as the toast envelope the dashboard
//! shows verbatim: `{success: false, message, code}`, plus `errors` listing
//! field issues when a form failed validation. The HTTP status keeps the
//! failure classes apart for callers that care.

use api::ApiError;
use api::billing::BillingError;
use api::export::ExportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Path named a resource, settings kind or upload feature that does not exist.
    #[error("unknown {kind}: {slug}")]
    UnknownTarget { kind: &'static str, slug: String },
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn unknown(kind: &'static str, slug: impl Into<String>) -> Self {
        Self::UnknownTarget { kind, slug: slug.into() }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => api_error_to_status(err),
            Self::Billing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnknownTarget { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Api(err) => err.error_code(),
            Self::Billing(_) => "E_BILLING",
            Self::Export(_) => "E_EXPORT",
            Self::UnknownTarget { .. } => "E_NOT_FOUND",
            Self::BadRequest(_) => "E_BAD_REQUEST",
        }
    }

    /// Text for the toast.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Export(_) => "Export failed. Please try again.".to_owned(),
            Self::Billing(_) | Self::UnknownTarget { .. } | Self::BadRequest(_) => self.to_string(),
        }
    }
}

pub(crate) fn api_error_to_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Rejected(_)
        | ApiError::Validation(_)
        | ApiError::InvalidUpload(_)
        | ApiError::InvalidId(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ApiError::ReadOnly(_) => StatusCode::METHOD_NOT_ALLOWED,
        ApiError::Transport(_) | ApiError::Status { .. } | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        ApiError::Config(_) | ApiError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::info!(code = self.error_code(), error = %self, "request refused");
        }

        let mut body = json!({
            "success": false,
            "message": self.message(),
            "code": self.error_code(),
        });
        if let Self::Api(ApiError::Validation(validation)) = &self {
            body["errors"] = json!(validation.issues);
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
