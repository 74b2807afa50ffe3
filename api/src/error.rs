//! Errors produced by remote API calls.

use crate::models::ValidationError;

/// Errors produced by [`crate::SellerBackend`] operations.
///
/// The remote API reports most failures as `{success: false, message}`.
/// Those become [`ApiError::Rejected`]; everything else is a transport,
/// status or decoding problem that the user can only retry.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value is missing or could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("request failed: {0}")]
    Transport(String),

    /// The remote answered with a non-success HTTP status.
    #[error("unexpected status {status}")]
    Status { status: u16, body: String },

    /// The bearer token was refused or no session is present.
    #[error("not signed in")]
    Unauthorized,

    /// The response body was not the expected envelope shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The remote processed the request and said no.
    #[error("{0}")]
    Rejected(String),

    /// Submitted data failed required-field checks before leaving the process.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A write was attempted against a resource the dashboard only reads.
    #[error("{0} cannot be modified from the dashboard")]
    ReadOnly(&'static str),

    /// A file upload was refused before being sent.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// A record id that cannot name exactly one record path segment.
    #[error("invalid record id: {0:?}")]
    InvalidId(String),
}

impl ApiError {
    /// Stable machine-readable code for logs and JSON error bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Decode(_) => "E_DECODE",
            Self::Rejected(_) => "E_REJECTED",
            Self::Validation(_) => "E_VALIDATION",
            Self::ReadOnly(_) => "E_READ_ONLY",
            Self::InvalidUpload(_) => "E_INVALID_UPLOAD",
            Self::InvalidId(_) => "E_INVALID_ID",
        }
    }

    /// Message suitable for a toast notification.
    ///
    /// Remote rejections and validation failures are shown verbatim; the
    /// internals of transport and decode failures are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::HttpClientBuild(_) => {
                "Could not reach the server. Please try again.".to_owned()
            }
            Self::Status { .. } | Self::Decode(_) => "The server returned an unexpected response.".to_owned(),
            Self::Config(_) => "The dashboard is not configured correctly.".to_owned(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_owned(),
            Self::Rejected(_)
            | Self::Validation(_)
            | Self::ReadOnly(_)
            | Self::InvalidUpload(_)
            | Self::InvalidId(_) => self.to_string(),
        }
    }
}
