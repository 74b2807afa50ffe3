//! Remote API configuration parsed from environment variables.

use crate::error::ApiError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the resource endpoints, without trailing slash.
    pub base_url: String,
    /// Base URL of the per-feature upload scripts, without trailing slash.
    pub upload_base_url: String,
    pub timeouts: Timeouts,
}

impl ApiConfig {
    /// Build a config for `base_url` with uploads under `{base_url}/uploads`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base_url = trim_url(base_url);
        let upload_base_url = format!("{base_url}/uploads");
        Self { base_url, upload_base_url, timeouts: Timeouts::default() }
    }

    /// Build typed API config from environment variables.
    ///
    /// Required:
    /// - `SELLER_API_BASE_URL`
    ///
    /// Optional:
    /// - `SELLER_UPLOAD_BASE_URL`: default `{SELLER_API_BASE_URL}/uploads`
    /// - `SELLER_API_REQUEST_TIMEOUT_SECS`: default 30
    /// - `SELLER_API_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is missing or is not an
    /// `http(s)` URL.
    pub fn from_env() -> Result<Self, ApiError> {
        let raw = std::env::var("SELLER_API_BASE_URL")
            .map_err(|_| ApiError::Config("SELLER_API_BASE_URL not set".into()))?;
        let mut config = Self::from_base_url(&raw)?;

        if let Ok(upload) = std::env::var("SELLER_UPLOAD_BASE_URL") {
            if !upload.trim().is_empty() {
                config.upload_base_url = trim_url(&upload);
            }
        }
        config.timeouts = Timeouts {
            request_secs: env_parse_u64("SELLER_API_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SELLER_API_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(config)
    }

    /// Validate and normalize a base URL given on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] unless the URL starts with `http://` or
    /// `https://`.
    pub fn from_base_url(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ApiError::Config(format!("invalid base URL: {trimmed}")));
        }
        Ok(Self::new(trimmed))
    }
}

fn trim_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
