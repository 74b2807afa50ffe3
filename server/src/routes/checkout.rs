//! Plan checkout pricing.
//!
//! Combines three backend reads (the plan, the seller's GST settings and an
//! optional coupon) into a priced quote. Payment itself happens in the
//! provider's hosted flow and is not handled here.

use api::billing::{BillingError, CheckoutQuote, checkout_quote};
use api::models::{Coupon, Plan, SiteSettings};
use api::backend::fetch_all;
use api::pagination::MAX_LIMIT;
use api::{ApiError, Credentials, Resource, SellerBackend, SettingsKind};
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::routes::auth::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteBody {
    #[serde(default, deserialize_with = "api::de::string")]
    pub plan_id: String,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// `POST /api/checkout/quote`: price a plan with GST and an optional coupon.
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<QuoteBody>,
) -> Result<Json<Value>, AppError> {
    let plan_id = body.plan_id.trim();
    if plan_id.is_empty() {
        return Err(AppError::BadRequest("plan_id is required".into()));
    }
    let code = body
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let backend = state.backend.as_ref();
    let creds = &session.creds;
    let (plan, site, coupon) = tokio::try_join!(
        load_plan(backend, creds, plan_id),
        load_site_settings(backend, creds),
        find_coupon(backend, creds, code),
    )?;

    let today = chrono::Local::now().date_naive();
    let quote: CheckoutQuote = checkout_quote(&plan, coupon.as_ref(), site.gst(), today)?;
    tracing::info!(plan = %quote.plan_name, total = quote.total, coupon = ?quote.coupon_code, "checkout quoted");
    Ok(Json(json!({ "success": true, "data": quote })))
}

async fn load_plan(backend: &dyn SellerBackend, creds: &Credentials, id: &str) -> Result<Plan, AppError> {
    let raw = backend.fetch(creds, Resource::Plans, id).await?;
    serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("plan: {e}")).into())
}

async fn load_site_settings(backend: &dyn SellerBackend, creds: &Credentials) -> Result<SiteSettings, AppError> {
    let raw = backend.settings(creds, SettingsKind::Site).await?;
    serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("site settings: {e}")).into())
}

/// Look the code up among the seller's coupons, walking every page of the
/// search. Codes compare case-insensitively.
async fn find_coupon(
    backend: &dyn SellerBackend,
    creds: &Credentials,
    code: Option<&str>,
) -> Result<Option<Coupon>, AppError> {
    let Some(code) = code else {
        return Ok(None);
    };
    let candidates = fetch_all(backend, creds, Resource::Coupons, Some(code.to_owned()), MAX_LIMIT).await?;
    for raw in candidates {
        let coupon: Coupon =
            serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("coupon: {e}")))?;
        if coupon.code.eq_ignore_ascii_case(code) {
            return Ok(Some(coupon));
        }
    }
    Err(BillingError::CouponNotApplicable(format!("Coupon {code} does not exist")).into())
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
