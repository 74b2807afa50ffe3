//! Catalogue of the backend collections and settings documents the dashboard
//! manages.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{
    Appointment, Category, Coupon, Customer, Employee, Event, ManualPaymentMethod, PaymentSettings, Service,
    SiteSettings, Validate, ValidationError, WebsiteSettings,
};

/// One spreadsheet column in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name in the record JSON.
    pub key: &'static str,
    /// Header cell text.
    pub title: &'static str,
    /// Write numeric strings as numbers.
    pub numeric: bool,
}

const fn text(key: &'static str, title: &'static str) -> Column {
    Column { key, title, numeric: false }
}

const fn number(key: &'static str, title: &'static str) -> Column {
    Column { key, title, numeric: true }
}

const CUSTOMER_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("name", "Name"),
    text("phone", "Phone"),
    text("email", "Email"),
    text("address", "Address"),
    text("created_at", "Created"),
];
const EMPLOYEE_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("name", "Name"),
    text("phone", "Phone"),
    text("email", "Email"),
    text("designation", "Designation"),
];
const SERVICE_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("name", "Name"),
    text("category_name", "Category"),
    number("price", "Price"),
    number("duration_minutes", "Duration (min)"),
];
const CATEGORY_COLUMNS: &[Column] = &[text("id", "ID"), text("name", "Name")];
const EVENT_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("title", "Title"),
    text("start_date", "Starts"),
    text("end_date", "Ends"),
    text("location", "Location"),
];
const COUPON_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("code", "Code"),
    text("discount_type", "Type"),
    number("discount_value", "Value"),
    number("min_order", "Minimum order"),
    text("expiry_date", "Expires"),
    text("status", "Active"),
];
const APPOINTMENT_COLUMNS: &[Column] = &[
    text("id", "ID"),
    text("customer_name", "Customer"),
    text("service_name", "Service"),
    text("date", "Date"),
    text("time_slot", "Time"),
    text("status", "Status"),
    number("amount", "Amount"),
];
const PAYMENT_METHOD_COLUMNS: &[Column] =
    &[text("id", "ID"), text("name", "Name"), text("account_details", "Account details"), text("status", "Active")];
const PLAN_COLUMNS: &[Column] =
    &[text("id", "ID"), text("name", "Name"), number("price", "Price"), number("duration_days", "Duration (days)")];

/// A paginated backend collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    Employees,
    Services,
    Categories,
    Events,
    Coupons,
    Appointments,
    PaymentMethods,
    Plans,
}

impl Resource {
    pub const ALL: [Self; 9] = [
        Self::Customers,
        Self::Employees,
        Self::Services,
        Self::Categories,
        Self::Events,
        Self::Coupons,
        Self::Appointments,
        Self::PaymentMethods,
        Self::Plans,
    ];

    /// Parse the URL slug used by the gateway and the CLI.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.slug() == slug)
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Customers => "customers",
            Self::Employees => "employees",
            Self::Services => "services",
            Self::Categories => "categories",
            Self::Events => "events",
            Self::Coupons => "coupons",
            Self::Appointments => "appointments",
            Self::PaymentMethods => "payment-methods",
            Self::Plans => "plans",
        }
    }

    /// Path segment under the backend base URL.
    #[must_use]
    pub fn remote_path(self) -> &'static str {
        match self {
            Self::PaymentMethods => "manual-payment-methods",
            other => other.slug(),
        }
    }

    /// Human name, also the export sheet title.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Employees => "Employees",
            Self::Services => "Services",
            Self::Categories => "Categories",
            Self::Events => "Events",
            Self::Coupons => "Coupons",
            Self::Appointments => "Appointments",
            Self::PaymentMethods => "Payment methods",
            Self::Plans => "Plans",
        }
    }

    /// Plans are managed by the platform, not the seller.
    #[must_use]
    pub fn read_only(self) -> bool {
        matches!(self, Self::Plans)
    }

    #[must_use]
    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Customers => CUSTOMER_COLUMNS,
            Self::Employees => EMPLOYEE_COLUMNS,
            Self::Services => SERVICE_COLUMNS,
            Self::Categories => CATEGORY_COLUMNS,
            Self::Events => EVENT_COLUMNS,
            Self::Coupons => COUPON_COLUMNS,
            Self::Appointments => APPOINTMENT_COLUMNS,
            Self::PaymentMethods => PAYMENT_METHOD_COLUMNS,
            Self::Plans => PLAN_COLUMNS,
        }
    }

    /// Required-field checks for a submitted form body.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the body is not an object or fails
    /// the entity's checks.
    pub fn validate_body(self, body: &Value) -> Result<(), ValidationError> {
        match self {
            Self::Customers => check::<Customer>(body),
            Self::Employees => check::<Employee>(body),
            Self::Services => check::<Service>(body),
            Self::Categories => check::<Category>(body),
            Self::Events => check::<Event>(body),
            Self::Coupons => check::<Coupon>(body),
            Self::Appointments => check::<Appointment>(body),
            Self::PaymentMethods => check::<ManualPaymentMethod>(body),
            Self::Plans => require_object(body),
        }
    }
}

/// A single settings document owned by the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKind {
    Site,
    Website,
    Payment,
}

impl SettingsKind {
    pub const ALL: [Self; 3] = [Self::Site, Self::Website, Self::Payment];

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Website => "website",
            Self::Payment => "payment",
        }
    }

    #[must_use]
    pub fn remote_path(self) -> &'static str {
        match self {
            Self::Site => "site-settings",
            Self::Website => "website-settings",
            Self::Payment => "payment-settings",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Site => "Site settings",
            Self::Website => "Website content",
            Self::Payment => "Payment settings",
        }
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the document fails its checks.
    pub fn validate_body(self, body: &Value) -> Result<(), ValidationError> {
        match self {
            Self::Site => check::<SiteSettings>(body),
            Self::Website => check::<WebsiteSettings>(body),
            Self::Payment => check::<PaymentSettings>(body),
        }
    }

    /// Shape a stored document for display. Payment secrets are masked.
    #[must_use]
    pub fn present(self, stored: Value) -> Value {
        if self != Self::Payment {
            return stored;
        }
        match serde_json::from_value::<PaymentSettings>(stored.clone()) {
            Ok(settings) => serde_json::to_value(settings.redacted()).unwrap_or(stored),
            Err(_) => stored,
        }
    }

    /// Shape a submitted document for saving. Masked secrets are dropped so
    /// the stored values survive.
    #[must_use]
    pub fn prepare(self, mut body: Value) -> Value {
        if self == Self::Payment {
            PaymentSettings::strip_masked_secrets(&mut body);
        }
        body
    }
}

fn require_object(body: &Value) -> Result<(), ValidationError> {
    if body.is_object() { Ok(()) } else { Err(ValidationError::single("body", "Expected a JSON object")) }
}

fn check<T: DeserializeOwned + Validate>(body: &Value) -> Result<(), ValidationError> {
    require_object(body)?;
    let record: T = serde_json::from_value(body.clone())
        .map_err(|e| ValidationError::single("body", format!("Invalid form data: {e}")))?;
    record.validate()
}

#[cfg(test)]
#[path = "resource_test.rs"]
mod tests;
