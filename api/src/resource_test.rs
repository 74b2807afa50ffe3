use super::*;
use serde_json::json;

#[test]
fn slugs_round_trip() {
    for resource in Resource::ALL {
        assert_eq!(Resource::from_slug(resource.slug()), Some(resource));
    }
    for kind in SettingsKind::ALL {
        assert_eq!(SettingsKind::from_slug(kind.slug()), Some(kind));
    }
    assert_eq!(Resource::from_slug("invoices"), None);
    assert_eq!(SettingsKind::from_slug("Site"), None);
}

#[test]
fn manual_payment_methods_use_backend_path() {
    assert_eq!(Resource::PaymentMethods.slug(), "payment-methods");
    assert_eq!(Resource::PaymentMethods.remote_path(), "manual-payment-methods");
    assert_eq!(Resource::Customers.remote_path(), "customers");
}

#[test]
fn only_plans_are_read_only() {
    let read_only: Vec<_> = Resource::ALL.into_iter().filter(|r| r.read_only()).collect();
    assert_eq!(read_only, vec![Resource::Plans]);
}

#[test]
fn every_resource_exports_an_id_column() {
    for resource in Resource::ALL {
        assert_eq!(resource.columns().first().map(|c| c.key), Some("id"), "{resource:?}");
    }
}

#[test]
fn validate_body_dispatches_to_entity() {
    let err = Resource::Customers.validate_body(&json!({"name": "Asha"})).unwrap_err();
    assert!(err.has_field("phone"));
    assert!(Resource::Customers.validate_body(&json!({"name": "Asha", "phone": "98450"})).is_ok());

    let err = Resource::Coupons.validate_body(&json!({"code": "X", "discount_value": 0})).unwrap_err();
    assert!(err.has_field("discount_value"));
}

#[test]
fn validate_body_requires_object() {
    let err = Resource::Categories.validate_body(&json!(["name"])).unwrap_err();
    assert!(err.has_field("body"));
    assert!(Resource::Plans.validate_body(&json!("x")).is_err());
}

#[test]
fn settings_validation() {
    assert!(SettingsKind::Site.validate_body(&json!({"business_name": ""})).is_err());
    assert!(SettingsKind::Website.validate_body(&json!({"hero_title": "Welcome"})).is_ok());
    assert!(SettingsKind::Payment.validate_body(&json!({"stripe_enabled": true})).is_err());
}

#[test]
fn payment_settings_present_and_prepare() {
    let stored = json!({"razorpay_enabled": 1, "razorpay_key_id": "rzp", "razorpay_key_secret": "abc", "webhook": "x"});
    let shown = SettingsKind::Payment.present(stored);
    assert_eq!(shown["razorpay_key_secret"], json!(crate::models::SECRET_MASK));
    assert_eq!(shown["webhook"], json!("x"));

    let saved = SettingsKind::Payment.prepare(shown);
    assert!(saved.get("razorpay_key_secret").is_none());

    let site = json!({"business_name": "Glow"});
    assert_eq!(SettingsKind::Site.present(site.clone()), site);
}
