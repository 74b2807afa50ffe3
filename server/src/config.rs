//! Gateway configuration parsed from environment variables.

use api::upload::DEFAULT_MAX_UPLOAD_BYTES;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_MAX_AGE_DAYS: i64 = 7;
/// Upper bound for the session cookie lifetime (about ten years).
pub const MAX_SESSION_MAX_AGE_DAYS: i64 = 3650;
pub const DEFAULT_EXPORT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Mark session cookies `Secure`.
    pub cookie_secure: bool,
    pub session_max_age_days: i64,
    pub max_upload_bytes: usize,
    /// Page size used when an export walks a whole collection.
    pub export_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cookie_secure: false,
            session_max_age_days: DEFAULT_SESSION_MAX_AGE_DAYS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            export_page_size: DEFAULT_EXPORT_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Build gateway config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `COOKIE_SECURE`: default inferred from `PUBLIC_URL` being `https://`
    /// - `SESSION_MAX_AGE_DAYS`: default 7, kept within 1..=3650
    /// - `MAX_UPLOAD_BYTES`: default 5 MiB
    /// - `EXPORT_PAGE_SIZE`: default 100
    ///
    /// Unparseable values fall back to their default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT", defaults.port),
            cookie_secure: cookie_secure(),
            session_max_age_days: session_days(env_parse("SESSION_MAX_AGE_DAYS", defaults.session_max_age_days)),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            export_page_size: env_parse("EXPORT_PAGE_SIZE", defaults.export_page_size),
        }
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn session_days(days: i64) -> i64 {
    days.clamp(1, MAX_SESSION_MAX_AGE_DAYS)
}

fn cookie_secure() -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }

    std::env::var("PUBLIC_URL")
        .map(|url| url.starts_with("https://"))
        .unwrap_or(false)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
