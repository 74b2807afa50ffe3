//! Auth routes: phone/password login, cookie session, logout.
//!
//! The backend issues a bearer token at login; the gateway keeps it in an
//! http-only `token` cookie next to the readable `user_id` and `user_data`
//! cookies the dashboard scripts use. No server-side session store exists.

use api::models::User;
use api::{ApiError, Credentials};
use axum::extract::State;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::error::AppError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";
pub const USER_ID_COOKIE: &str = "user_id";
pub const USER_DATA_COOKIE: &str = "user_data";

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Backend credentials carried by the request cookies.
/// Use as a handler parameter to require a signed-in seller.
pub struct Session {
    pub creds: Credentials,
    /// Snapshot from `user_data`; absent or unreadable cookies give `None`.
    pub user: Option<User>,
}

impl<S> axum::extract::FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(TOKEN_COOKIE).map(Cookie::value).unwrap_or_default();
        let user_id = jar.get(USER_ID_COOKIE).map(Cookie::value).unwrap_or_default();
        if token.is_empty() || user_id.is_empty() {
            return Err(ApiError::Unauthorized.into());
        }

        let user = jar
            .get(USER_DATA_COOKIE)
            .and_then(|c| decode_user(c.value()));
        Ok(Self { creds: Credentials::new(token, user_id), user })
    }
}

pub(crate) fn encode_user(user: &User) -> String {
    let raw = serde_json::to_string(user).unwrap_or_default();
    utf8_percent_encode(&raw, NON_ALPHANUMERIC).to_string()
}

pub(crate) fn decode_user(raw: &str) -> Option<User> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    serde_json::from_str(&decoded).ok()
}

fn session_cookie(name: &'static str, value: String, http_only: bool, state: &AppState) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(Duration::days(state.config.session_max_age_days))
        .build()
}

fn expired_cookie(name: &'static str, http_only: bool, state: &AppState) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    password: String,
}

/// `POST /api/auth/login`: exchange phone + password for session cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, AppError> {
    let phone = body.phone.trim();
    if phone.is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("Phone and password are required".into()));
    }

    let session = state.backend.login(phone, &body.password).await?;
    tracing::info!(user_id = %session.user.id, "seller signed in");

    let jar = jar
        .add(session_cookie(TOKEN_COOKIE, session.token.clone(), true, &state))
        .add(session_cookie(USER_ID_COOKIE, session.user.id.clone(), false, &state))
        .add(session_cookie(USER_DATA_COOKIE, encode_user(&session.user), false, &state));

    Ok((jar, Json(json!({ "success": true, "message": "Login successful", "user": session.user }))))
}

/// `GET /api/auth/me`: return the signed-in seller snapshot.
pub async fn me(session: Session) -> Json<serde_json::Value> {
    let user = session.user.map_or_else(
        || json!({ "id": session.creds.user_id }),
        |user| json!(user),
    );
    Json(json!({ "success": true, "user": user }))
}

/// `POST /api/auth/logout`: clear all session cookies.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(user_id) = jar.get(USER_ID_COOKIE).map(Cookie::value) {
        tracing::info!(%user_id, "seller signed out");
    }
    let jar = jar
        .add(expired_cookie(TOKEN_COOKIE, true, &state))
        .add(expired_cookie(USER_ID_COOKIE, false, &state))
        .add(expired_cookie(USER_DATA_COOKIE, false, &state));
    (jar, Json(json!({ "success": true, "message": "Logged out" })))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
