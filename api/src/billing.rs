//! GST and discount arithmetic for the plan checkout.
//!
//! All amounts are in the seller's currency and rounded to two decimals at
//! each step the invoice shows. Discounts apply before tax.

use chrono::NaiveDate;
use serde::Serialize;

use crate::format::format_amount;
use crate::models::{Coupon, DiscountKind, Plan};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BillingError {
    #[error("amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),
    #[error("GST rate must be between 0 and 100, got {0}")]
    InvalidRate(f64),
    #[error("{0}")]
    CouponNotApplicable(String),
}

/// Tax configuration taken from the seller's site settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GstSettings {
    /// Percentage, `0..=100`.
    pub rate: f64,
    /// Whether listed prices already include GST.
    pub inclusive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GstBreakdown {
    /// Amount before tax.
    pub taxable: f64,
    pub gst: f64,
    /// Amount the customer pays.
    pub total: f64,
}

/// Split or add GST on `amount`.
///
/// Exclusive: `gst = amount * rate / 100`, `total = amount + gst`.
/// Inclusive: `taxable = amount * 100 / (100 + rate)`, `gst = amount - taxable`,
/// `total = amount`.
///
/// # Errors
///
/// Returns [`BillingError`] for a negative or non-finite amount, or a rate
/// outside `0..=100`.
pub fn calculate_gst(amount: f64, rate: f64, inclusive: bool) -> Result<GstBreakdown, BillingError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BillingError::InvalidAmount(amount));
    }
    if !rate.is_finite() || !(0.0..=100.0).contains(&rate) {
        return Err(BillingError::InvalidRate(rate));
    }

    if inclusive {
        let taxable = round2(amount * 100.0 / (100.0 + rate));
        Ok(GstBreakdown { taxable, gst: round2(amount - taxable), total: round2(amount) })
    } else {
        let taxable = round2(amount);
        let gst = round2(amount * rate / 100.0);
        Ok(GstBreakdown { taxable, gst, total: round2(taxable + gst) })
    }
}

/// Discount `coupon` grants on `subtotal` as of `today`.
///
/// # Errors
///
/// Returns [`BillingError::CouponNotApplicable`] when the coupon is inactive,
/// expired, below its minimum order or has no value.
pub fn apply_coupon(subtotal: f64, coupon: &Coupon, today: NaiveDate) -> Result<f64, BillingError> {
    if !coupon.status {
        return Err(not_applicable(coupon, "is not active"));
    }
    match coupon.expiry() {
        Ok(Some(expiry)) if expiry < today => return Err(not_applicable(coupon, "has expired")),
        Ok(_) => {}
        Err(raw) => {
            tracing::warn!(code = %coupon.code, expiry = raw, "unreadable coupon expiry date");
            return Err(not_applicable(coupon, "has an unreadable expiry date"));
        }
    }
    if let Some(min) = coupon.min_order {
        if subtotal < min {
            return Err(not_applicable(coupon, &format!("needs a minimum order of {}", format_amount(min))));
        }
    }
    let value = coupon
        .discount_value
        .filter(|v| *v > 0.0)
        .ok_or_else(|| not_applicable(coupon, "has no discount value"))?;

    let discount = match coupon.discount_type {
        DiscountKind::Percentage => subtotal * value.min(100.0) / 100.0,
        DiscountKind::Flat => value.min(subtotal),
    };
    Ok(round2(discount))
}

fn not_applicable(coupon: &Coupon, reason: &str) -> BillingError {
    BillingError::CouponNotApplicable(format!("Coupon {} {reason}", coupon.code))
}

/// Priced summary shown on the checkout page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutQuote {
    pub plan_name: String,
    pub subtotal: f64,
    pub discount: f64,
    pub taxable: f64,
    pub gst: f64,
    pub gst_rate: f64,
    pub gst_inclusive: bool,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Price `plan` with an optional coupon and the seller's GST settings.
///
/// # Errors
///
/// Propagates coupon and GST failures.
pub fn checkout_quote(
    plan: &Plan,
    coupon: Option<&Coupon>,
    gst: GstSettings,
    today: NaiveDate,
) -> Result<CheckoutQuote, BillingError> {
    let subtotal = round2(plan.price);
    let discount = match coupon {
        Some(coupon) => apply_coupon(subtotal, coupon, today)?,
        None => 0.0,
    };
    let breakdown = calculate_gst(round2(subtotal - discount), gst.rate, gst.inclusive)?;

    Ok(CheckoutQuote {
        plan_name: plan.name.clone(),
        subtotal,
        discount,
        taxable: breakdown.taxable,
        gst: breakdown.gst,
        gst_rate: gst.rate,
        gst_inclusive: gst.inclusive,
        total: breakdown.total,
        coupon_code: coupon.map(|c| c.code.clone()),
    })
}

#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "billing_test.rs"]
mod tests;
