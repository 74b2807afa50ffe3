//! reqwest-backed [`SellerBackend`].
//!
//! Every call is one request: bearer token in `Authorization`, tenant id in
//! the `user_id` query parameter, JSON envelope back. Non-2xx statuses,
//! undecodable bodies and `success:false` envelopes each map to their own
//! [`ApiError`] variant.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::backend::{Credentials, LoginSession, SellerBackend};
use crate::config::ApiConfig;
use crate::envelope::{Ack, Envelope, Page};
use crate::error::ApiError;
use crate::models::{AppointmentStatus, User};
use crate::pagination::PageQuery;
use crate::resource::{Resource, SettingsKind};
use crate::upload::{FileUpload, UploadFeature};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    upload_base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), upload_base_url: config.upload_base_url.clone() })
    }

    /// # Errors
    ///
    /// See [`ApiConfig::from_env`] and [`ApiClient::new`].
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ApiConfig::from_env()?)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, creds: &Credentials) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.http
            .request(method, url)
            .bearer_auth(&creds.token)
            .query(&[("user_id", creds.user_id.as_str())])
    }

    async fn send(&self, request: RequestBuilder, label: &str) -> Result<Envelope, ApiError> {
        self.send_with(request, label, false).await
    }

    /// A 401/403 carrying a `success:false` message becomes [`ApiError::Rejected`]
    /// when `accept_refusal_message` is set; otherwise it is always
    /// [`ApiError::Unauthorized`].
    async fn send_with(
        &self,
        request: RequestBuilder,
        label: &str,
        accept_refusal_message: bool,
    ) -> Result<Envelope, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(call = label, error = %e, "backend request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let refused = status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN;
        if refused && !accept_refusal_message {
            tracing::info!(call = label, status = status.as_u16(), "backend refused credentials");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            // PHP scripts often answer 4xx with a normal envelope; prefer its message.
            if let Ok(envelope) = Envelope::parse(&text) {
                if let Some(message) = envelope.message.filter(|_| !envelope.success) {
                    tracing::info!(call = label, status = status.as_u16(), %message, "backend rejected request");
                    return Err(ApiError::Rejected(message));
                }
            }
            if refused {
                return Err(ApiError::Unauthorized);
            }
            tracing::warn!(call = label, status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }

        let envelope = Envelope::parse(&text)?.into_result();
        match &envelope {
            Ok(_) => tracing::debug!(call = label, "backend call ok"),
            Err(e) => tracing::info!(call = label, error = %e, "backend rejected request"),
        }
        envelope
    }

    async fn mutate(&self, request: RequestBuilder, label: &str) -> Result<Ack, ApiError> {
        Ok(self.send(request, label).await?.into_ack())
    }
}

fn collection_path(resource: Resource) -> String {
    resource.remote_path().to_owned()
}

fn record_path(resource: Resource, id: &str) -> Result<String, ApiError> {
    Ok(format!("{}/{}", resource.remote_path(), record_id(id)?))
}

/// Ids come from URLs and forms and must be one `[A-Za-z0-9_-]+` segment.
fn record_id(raw: &str) -> Result<&str, ApiError> {
    let id = raw.trim();
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_')) {
        return Err(ApiError::InvalidId(raw.to_owned()));
    }
    Ok(id)
}

fn login_session(envelope: Envelope) -> Result<LoginSession, ApiError> {
    let data = envelope.data.unwrap_or(Value::Null);
    let token = envelope
        .token
        .or_else(|| data.get("token").and_then(crate::de::value_to_string))
        .ok_or_else(|| ApiError::Decode("login response has no token".into()))?;

    let raw_user = envelope
        .user
        .or_else(|| data.get("user").cloned())
        .unwrap_or(data);
    let user: User = serde_json::from_value(raw_user).map_err(|e| ApiError::Decode(format!("login user: {e}")))?;
    if user.id.is_empty() {
        return Err(ApiError::Decode("login response has no user id".into()));
    }
    Ok(LoginSession { token, user })
}

#[async_trait::async_trait]
impl SellerBackend for ApiClient {
    async fn login(&self, phone: &str, password: &str) -> Result<LoginSession, ApiError> {
        let url = format!("{}/auth/login", self.base_url);
        let request = self
            .http
            .post(url)
            .json(&serde_json::json!({ "phone": phone.trim(), "password": password }));
        let envelope = self.send_with(request, "auth.login", true).await?;
        login_session(envelope)
    }

    async fn list(&self, creds: &Credentials, resource: Resource, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        let request = self
            .request(Method::GET, &collection_path(resource), creds)
            .query(&query.to_params());
        Ok(self.send(request, resource.slug()).await?.into_page())
    }

    async fn fetch(&self, creds: &Credentials, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, &record_path(resource, id)?, creds);
        self.send(request, resource.slug()).await?.into_data()
    }

    async fn create(&self, creds: &Credentials, resource: Resource, body: &Value) -> Result<Ack, ApiError> {
        if resource.read_only() {
            return Err(ApiError::ReadOnly(resource.label()));
        }
        let request = self
            .request(Method::POST, &collection_path(resource), creds)
            .json(body);
        self.mutate(request, resource.slug()).await
    }

    async fn update(&self, creds: &Credentials, resource: Resource, id: &str, body: &Value) -> Result<Ack, ApiError> {
        if resource.read_only() {
            return Err(ApiError::ReadOnly(resource.label()));
        }
        let request = self
            .request(Method::PUT, &record_path(resource, id)?, creds)
            .json(body);
        self.mutate(request, resource.slug()).await
    }

    async fn delete(&self, creds: &Credentials, resource: Resource, id: &str) -> Result<Ack, ApiError> {
        if resource.read_only() {
            return Err(ApiError::ReadOnly(resource.label()));
        }
        let request = self.request(Method::DELETE, &record_path(resource, id)?, creds);
        self.mutate(request, resource.slug()).await
    }

    async fn update_appointment_status(
        &self,
        creds: &Credentials,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Ack, ApiError> {
        let path = format!("{}/status", record_path(Resource::Appointments, id)?);
        let request = self
            .request(Method::PUT, &path, creds)
            .json(&serde_json::json!({ "status": status }));
        self.mutate(request, "appointments.status").await
    }

    async fn settings(&self, creds: &Credentials, kind: SettingsKind) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, kind.remote_path(), creds);
        self.send(request, kind.remote_path()).await?.into_data()
    }

    async fn save_settings(&self, creds: &Credentials, kind: SettingsKind, body: &Value) -> Result<Ack, ApiError> {
        let request = self.request(Method::PUT, kind.remote_path(), creds).json(body);
        self.mutate(request, kind.remote_path()).await
    }

    async fn upload(&self, creds: &Credentials, feature: UploadFeature, file: FileUpload) -> Result<String, ApiError> {
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        let url = format!("{}/{}", self.upload_base_url, feature.script());
        let request = self
            .http
            .post(url)
            .bearer_auth(&creds.token)
            .query(&[("user_id", creds.user_id.as_str())])
            .multipart(Form::new().part("file", part));

        let envelope = self.send(request, feature.script()).await?;
        let from_data = envelope
            .data
            .as_ref()
            .and_then(|d| d.get("filename"))
            .and_then(crate::de::value_to_string);
        let filename = envelope
            .filename
            .or(from_data)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ApiError::Decode("upload response has no filename".into()))?;
        tracing::info!(feature = feature.slug(), size, %filename, "file uploaded");
        Ok(filename)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
