//! Dashboard summary tiles.

use api::format::abbreviate_number;
use api::{Credentials, PageQuery, Resource, SellerBackend};
use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::auth::Session;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    pub resource: &'static str,
    pub title: &'static str,
    pub count: u64,
    /// Short form for the tile, e.g. `1.5k`.
    pub label: String,
}

async fn tile(backend: &dyn SellerBackend, creds: &Credentials, resource: Resource) -> Result<Tile, AppError> {
    let page = backend
        .list(creds, resource, &PageQuery::default().with_limit(1))
        .await?;
    #[allow(clippy::cast_precision_loss)]
    let label = abbreviate_number(page.total_records as f64);
    Ok(Tile { resource: resource.slug(), title: resource.label(), count: page.total_records, label })
}

/// `GET /api/dashboard`: record counts per collection, fetched concurrently.
pub async fn summary(State(state): State<AppState>, session: Session) -> Result<Json<Value>, AppError> {
    let backend = state.backend.as_ref();
    let creds = &session.creds;
    let tiles = tokio::try_join!(
        tile(backend, creds, Resource::Customers),
        tile(backend, creds, Resource::Appointments),
        tile(backend, creds, Resource::Services),
        tile(backend, creds, Resource::Employees),
        tile(backend, creds, Resource::Events),
        tile(backend, creds, Resource::Coupons),
    )?;
    let tiles = [tiles.0, tiles.1, tiles.2, tiles.3, tiles.4, tiles.5];

    Ok(Json(json!({ "success": true, "data": tiles, "user": session.user })))
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
