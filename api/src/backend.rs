//! The seam between callers and the remote API.
//!
//! Gateway handlers and the CLI talk to a `dyn SellerBackend`; the real
//! implementation is [`crate::ApiClient`], tests substitute canned ones.

use serde::Serialize;
use serde_json::Value;

use crate::envelope::{Ack, Page};
use crate::error::ApiError;
use crate::models::{AppointmentStatus, User};
use crate::pagination::PageQuery;
use crate::resource::{Resource, SettingsKind};
use crate::upload::{FileUpload, UploadFeature};

/// Bearer token plus the tenant id every backend call is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub user_id: String,
}

impl Credentials {
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { token: token.into(), user_id: user_id.into() }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginSession {
    #[serde(skip)]
    pub token: String,
    pub user: User,
}

impl LoginSession {
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.token.clone(), self.user.id.clone())
    }
}

#[async_trait::async_trait]
pub trait SellerBackend: Send + Sync {
    /// Exchange phone + password for a bearer token and user snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] with the backend's message on bad
    /// credentials.
    async fn login(&self, phone: &str, password: &str) -> Result<LoginSession, ApiError>;

    /// One page of a collection. An empty collection is an empty page.
    async fn list(&self, creds: &Credentials, resource: Resource, query: &PageQuery) -> Result<Page<Value>, ApiError>;

    async fn fetch(&self, creds: &Credentials, resource: Resource, id: &str) -> Result<Value, ApiError>;

    async fn create(&self, creds: &Credentials, resource: Resource, body: &Value) -> Result<Ack, ApiError>;

    async fn update(&self, creds: &Credentials, resource: Resource, id: &str, body: &Value) -> Result<Ack, ApiError>;

    async fn delete(&self, creds: &Credentials, resource: Resource, id: &str) -> Result<Ack, ApiError>;

    async fn update_appointment_status(
        &self,
        creds: &Credentials,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Ack, ApiError>;

    async fn settings(&self, creds: &Credentials, kind: SettingsKind) -> Result<Value, ApiError>;

    async fn save_settings(&self, creds: &Credentials, kind: SettingsKind, body: &Value) -> Result<Ack, ApiError>;

    /// Store a file and return the path the backend saved it under.
    async fn upload(&self, creds: &Credentials, feature: UploadFeature, file: FileUpload) -> Result<String, ApiError>;
}

/// Fetch every page of a collection, `limit` records at a time.
///
/// Pages are requested one after another; the loop stops at the reported
/// page count or at the first short page.
///
/// # Errors
///
/// Propagates the first failing page.
pub async fn fetch_all(
    backend: &dyn SellerBackend,
    creds: &Credentials,
    resource: Resource,
    search: Option<String>,
    limit: u32,
) -> Result<Vec<Value>, ApiError> {
    let mut query = PageQuery::default().with_limit(limit).with_search(search);
    let mut records = Vec::new();
    loop {
        let page = backend.list(creds, resource, &query).await?;
        let fetched = page.records.len();
        records.extend(page.records);
        let last_page = u64::from(query.page) >= page.total_pages || fetched < query.limit as usize;
        if last_page {
            break;
        }
        query.page += 1;
    }
    tracing::debug!(resource = resource.slug(), count = records.len(), "fetched all pages");
    Ok(records)
}
