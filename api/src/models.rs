//! Local mirrors of the backend's entities.
//!
//! DESIGN
//! ======
//! The remote API owns these records. The structs here exist for two jobs:
//! required-field checks before a form submission leaves the process, and
//! the handful of fields the gateway computes with (prices, GST settings,
//! coupon rules). Unknown columns are kept in `extra` so that a record read
//! and written back through these types loses nothing.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::de;

// =============================================================================
// VALIDATION
// =============================================================================

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in a submitted record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self { issues: vec![FieldIssue { field, message: message.into() }] }
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Accumulates field issues for a single record.
#[derive(Debug, Default)]
pub struct Issues(Vec<FieldIssue>);

impl Issues {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldIssue { field, message: message.into() });
    }

    pub fn require(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        }
    }

    pub fn require_some<T>(&mut self, field: &'static str, label: &str, value: Option<&T>) {
        if value.is_none() {
            self.push(field, format!("{label} is required"));
        }
    }

    /// # Errors
    ///
    /// Returns the collected issues if there are any.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() { Ok(()) } else { Err(ValidationError { issues: self.0 }) }
    }
}

/// Required-field checks run before a record is sent to the backend.
pub trait Validate {
    fn check(&self, issues: &mut Issues);

    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();
        self.check(&mut issues);
        issues.finish()
    }
}

// =============================================================================
// USER
// =============================================================================

/// Snapshot of the signed-in seller, stored in the `user_data` cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "de::string")]
    pub id: String,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

// =============================================================================
// CUSTOMERS / EMPLOYEES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Customer {
    fn check(&self, issues: &mut Issues) {
        issues.require("name", "Name", &self.name);
        issues.require("phone", "Phone", &self.phone);
        check_email(issues, self.email.as_deref());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Employee {
    fn check(&self, issues: &mut Issues) {
        issues.require("name", "Name", &self.name);
        issues.require("phone", "Phone", &self.phone);
        check_email(issues, self.email.as_deref());
    }
}

fn check_email(issues: &mut Issues, email: Option<&str>) {
    if let Some(email) = email {
        let valid = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            issues.push("email", "Email address is not valid");
        }
    }
}

// =============================================================================
// CATALOGUE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u64", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Service {
    fn check(&self, issues: &mut Issues) {
        issues.require("name", "Name", &self.name);
        match self.price {
            None => issues.push("price", "Price is required"),
            Some(p) if p < 0.0 => issues.push("price", "Price cannot be negative"),
            Some(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Category {
    fn check(&self, issues: &mut Issues) {
        issues.require("name", "Name", &self.name);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub title: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Event {
    fn check(&self, issues: &mut Issues) {
        issues.require("title", "Title", &self.title);
        issues.require_some("start_date", "Start date", self.start_date.as_ref());
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                issues.push("end_date", "End date cannot be before the start date");
            }
        }
    }
}

// =============================================================================
// COUPONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    #[default]
    Percentage,
    Flat,
}

impl DiscountKind {
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" | "percent" | "%" => Some(Self::Percentage),
            "flat" | "fixed" | "amount" => Some(Self::Flat),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for DiscountKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = de::opt_string(deserializer)?;
        Ok(raw.as_deref().and_then(Self::from_str).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub code: String,
    #[serde(default)]
    pub discount_type: DiscountKind,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub discount_value: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub min_order: Option<f64>,
    /// Raw `expiry_date` as sent; read through [`Coupon::expiry`].
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(default = "active_by_default", deserialize_with = "de::bool")]
    pub status: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn active_by_default() -> bool {
    true
}

impl Coupon {
    /// Last valid day, if any.
    ///
    /// # Errors
    ///
    /// Returns the raw text when it is not a `YYYY-MM-DD[ time]` date.
    pub fn expiry(&self) -> Result<Option<NaiveDate>, &str> {
        match self.expiry_date.as_deref() {
            None => Ok(None),
            Some(raw) => de::parse_date(raw).map(Some).ok_or(raw),
        }
    }
}

impl Validate for Coupon {
    fn check(&self, issues: &mut Issues) {
        issues.require("code", "Coupon code", &self.code);
        if self.code.chars().any(char::is_whitespace) {
            issues.push("code", "Coupon code cannot contain spaces");
        }
        match self.discount_value {
            None => issues.push("discount_value", "Discount value is required"),
            Some(v) if v <= 0.0 => issues.push("discount_value", "Discount value must be greater than zero"),
            Some(v) if self.discount_type == DiscountKind::Percentage && v > 100.0 => {
                issues.push("discount_value", "Percentage discount cannot exceed 100");
            }
            Some(_) => {}
        }
        if self.min_order.is_some_and(|m| m < 0.0) {
            issues.push("min_order", "Minimum order cannot be negative");
        }
        if self.expiry().is_err() {
            issues.push("expiry_date", "Expiry date must be YYYY-MM-DD");
        }
    }
}

// =============================================================================
// APPOINTMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" | "accepted" => Some(Self::Confirmed),
            "completed" | "done" => Some(Self::Completed),
            "cancelled" | "canceled" | "rejected" => Some(Self::Cancelled),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = de::opt_string(deserializer)?;
        Ok(raw.as_deref().and_then(Self::from_str).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_date", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Appointment {
    fn check(&self, issues: &mut Issues) {
        if self.customer_id.is_none() && self.customer_name.is_none() {
            issues.push("customer_id", "Customer is required");
        }
        issues.require_some("service_id", "Service", self.service_id.as_ref());
        issues.require_some("date", "Date", self.date.as_ref());
    }
}

// =============================================================================
// PAYMENTS & PLANS
// =============================================================================

/// Offline payment option (bank transfer, UPI QR, cash) shown at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualPaymentMethod {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub account_details: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
    #[serde(default = "active_by_default", deserialize_with = "de::bool")]
    pub status: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for ManualPaymentMethod {
    fn check(&self, issues: &mut Issues) {
        issues.require("name", "Name", &self.name);
        if self.instructions.is_none() && self.account_details.is_none() && self.qr_image.is_none() {
            issues.push("instructions", "Add instructions, account details or a QR image");
        }
    }
}

/// Subscription plan a seller can buy. Read-only from the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "de::opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "de::opt_u64", skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default, deserialize_with = "de::string")]
    pub business_name: String,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64", skip_serializing_if = "Option::is_none")]
    pub gst_rate: Option<f64>,
    #[serde(default, deserialize_with = "de::bool")]
    pub gst_inclusive: bool,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteSettings {
    /// GST configuration used at checkout. No rate configured means no tax.
    #[must_use]
    pub fn gst(&self) -> crate::billing::GstSettings {
        crate::billing::GstSettings { rate: self.gst_rate.unwrap_or(0.0), inclusive: self.gst_inclusive }
    }
}

impl Validate for SiteSettings {
    fn check(&self, issues: &mut Issues) {
        issues.require("business_name", "Business name", &self.business_name);
        if let Some(rate) = self.gst_rate {
            if !(0.0..=100.0).contains(&rate) {
                issues.push("gst_rate", "GST rate must be between 0 and 100");
            }
        }
        check_email(issues, self.contact_email.as_deref());
    }
}

/// Content blocks of the seller's public website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteSettings {
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub facebook_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for WebsiteSettings {
    fn check(&self, issues: &mut Issues) {
        let links = [
            ("facebook_url", &self.facebook_url),
            ("instagram_url", &self.instagram_url),
            ("youtube_url", &self.youtube_url),
        ];
        for (field, link) in links {
            if let Some(link) = link {
                if !(link.starts_with("http://") || link.starts_with("https://")) {
                    issues.push(field, format!("{link} is not a valid link"));
                }
            }
        }
    }
}

/// Online payment provider credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSettings {
    #[serde(default, deserialize_with = "de::bool")]
    pub razorpay_enabled: bool,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub razorpay_key_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub razorpay_key_secret: Option<String>,
    #[serde(default, deserialize_with = "de::bool")]
    pub stripe_enabled: bool,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub stripe_publishable_key: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string", skip_serializing_if = "Option::is_none")]
    pub stripe_secret_key: Option<String>,
    #[serde(default, deserialize_with = "de::bool")]
    pub manual_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for PaymentSettings {
    fn check(&self, issues: &mut Issues) {
        if self.razorpay_enabled {
            issues.require_some("razorpay_key_id", "Razorpay key id", self.razorpay_key_id.as_ref());
            issues.require_some("razorpay_key_secret", "Razorpay key secret", self.razorpay_key_secret.as_ref());
        }
        if self.stripe_enabled {
            issues.require_some("stripe_publishable_key", "Stripe publishable key", self.stripe_publishable_key.as_ref());
            issues.require_some("stripe_secret_key", "Stripe secret key", self.stripe_secret_key.as_ref());
        }
    }
}

/// Placeholder sent to the browser in place of stored provider secrets.
pub const SECRET_MASK: &str = "********";

const SECRET_FIELDS: [&str; 2] = ["razorpay_key_secret", "stripe_secret_key"];

impl PaymentSettings {
    /// Copy with secrets blanked, for responses sent back to the browser.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |s: &Option<String>| s.as_ref().map(|_| SECRET_MASK.to_owned());
        Self {
            razorpay_key_secret: mask(&self.razorpay_key_secret),
            stripe_secret_key: mask(&self.stripe_secret_key),
            ..self.clone()
        }
    }

    /// Drop secret fields the form echoed back unchanged so the stored
    /// values are kept.
    pub fn strip_masked_secrets(body: &mut Value) {
        if let Some(obj) = body.as_object_mut() {
            for field in SECRET_FIELDS {
                if obj.get(field).and_then(Value::as_str) == Some(SECRET_MASK) {
                    obj.remove(field);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
