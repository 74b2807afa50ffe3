use super::*;
use serde_json::json;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn plan(price: f64) -> Plan {
    serde_json::from_value(json!({"id": 2, "name": "Pro", "price": price})).unwrap()
}

fn coupon(raw: serde_json::Value) -> Coupon {
    serde_json::from_value(raw).unwrap()
}

// =============================================================================
// calculate_gst
// =============================================================================

#[test]
fn exclusive_adds_tax() {
    let b = calculate_gst(1000.0, 18.0, false).unwrap();
    assert!(close(b.taxable, 1000.0));
    assert!(close(b.gst, 180.0));
    assert!(close(b.total, 1180.0));
}

#[test]
fn inclusive_extracts_tax() {
    let b = calculate_gst(1180.0, 18.0, true).unwrap();
    assert!(close(b.taxable, 1000.0));
    assert!(close(b.gst, 180.0));
    assert!(close(b.total, 1180.0));
}

#[test]
fn zero_rate_is_no_tax_either_way() {
    for inclusive in [false, true] {
        let b = calculate_gst(499.99, 0.0, inclusive).unwrap();
        assert!(close(b.gst, 0.0));
        assert!(close(b.taxable, 499.99));
        assert!(close(b.total, 499.99));
    }
}

#[test]
fn hundred_percent_boundary() {
    let exclusive = calculate_gst(100.0, 100.0, false).unwrap();
    assert!(close(exclusive.gst, 100.0));
    assert!(close(exclusive.total, 200.0));

    let inclusive = calculate_gst(200.0, 100.0, true).unwrap();
    assert!(close(inclusive.taxable, 100.0));
    assert!(close(inclusive.gst, 100.0));
    assert!(close(inclusive.total, 200.0));
}

#[test]
fn inclusive_rounding_keeps_parts_summing_to_total() {
    let b = calculate_gst(999.0, 18.0, true).unwrap();
    assert!(close(b.taxable, 846.61));
    assert!(close(b.gst, 152.39));
    assert!(close(b.taxable + b.gst, b.total));
}

#[test]
fn invalid_inputs_rejected() {
    assert_eq!(calculate_gst(-1.0, 18.0, false), Err(BillingError::InvalidAmount(-1.0)));
    assert_eq!(calculate_gst(10.0, 100.5, false), Err(BillingError::InvalidRate(100.5)));
    assert!(calculate_gst(f64::NAN, 5.0, true).is_err());
    assert!(calculate_gst(10.0, -0.1, true).is_err());
}

// =============================================================================
// apply_coupon
// =============================================================================

#[test]
fn percentage_coupon() {
    let c = coupon(json!({"code": "TEN", "discount_type": "percentage", "discount_value": 10}));
    assert!(close(apply_coupon(1999.0, &c, today()).unwrap(), 199.9));
}

#[test]
fn flat_coupon_capped_at_subtotal() {
    let c = coupon(json!({"code": "FLAT500", "discount_type": "flat", "discount_value": 500}));
    assert!(close(apply_coupon(300.0, &c, today()).unwrap(), 300.0));
    assert!(close(apply_coupon(800.0, &c, today()).unwrap(), 500.0));
}

#[test]
fn expired_coupon_rejected_but_expiry_day_still_valid() {
    let c = coupon(json!({"code": "OLD", "discount_value": 5, "expiry_date": "2024-06-14"}));
    let err = apply_coupon(100.0, &c, today()).unwrap_err();
    assert_eq!(err.to_string(), "Coupon OLD has expired");

    let last_day = coupon(json!({"code": "EDGE", "discount_value": 5, "expiry_date": "2024-06-15"}));
    assert!(apply_coupon(100.0, &last_day, today()).is_ok());
}

#[test]
fn unreadable_expiry_is_not_applicable() {
    let c = coupon(json!({"code": "DMY", "discount_value": 5, "expiry_date": "31/12/2099"}));
    let err = apply_coupon(100.0, &c, today()).unwrap_err();
    assert_eq!(err.to_string(), "Coupon DMY has an unreadable expiry date");

    let timestamped = coupon(json!({"code": "TS", "discount_value": 5, "expiry_date": "2024-06-20 23:59:59"}));
    assert!(apply_coupon(100.0, &timestamped, today()).is_ok());
}

#[test]
fn inactive_and_minimum_order() {
    let off = coupon(json!({"code": "OFF", "discount_value": 5, "status": 0}));
    assert!(matches!(apply_coupon(100.0, &off, today()), Err(BillingError::CouponNotApplicable(_))));

    let min = coupon(json!({"code": "BIG", "discount_value": 5, "min_order": "1000"}));
    let err = apply_coupon(999.0, &min, today()).unwrap_err();
    assert!(err.to_string().contains("1,000.00"));
    assert!(apply_coupon(1000.0, &min, today()).is_ok());
}

// =============================================================================
// checkout_quote
// =============================================================================

#[test]
fn quote_discounts_before_tax() {
    let c = coupon(json!({"code": "TEN", "discount_value": 10}));
    let q = checkout_quote(&plan(1000.0), Some(&c), GstSettings { rate: 18.0, inclusive: false }, today()).unwrap();
    assert!(close(q.subtotal, 1000.0));
    assert!(close(q.discount, 100.0));
    assert!(close(q.taxable, 900.0));
    assert!(close(q.gst, 162.0));
    assert!(close(q.total, 1062.0));
    assert_eq!(q.coupon_code.as_deref(), Some("TEN"));
    assert_eq!(q.plan_name, "Pro");
}

#[test]
fn quote_without_coupon_inclusive() {
    let q = checkout_quote(&plan(1180.0), None, GstSettings { rate: 18.0, inclusive: true }, today()).unwrap();
    assert!(close(q.discount, 0.0));
    assert!(close(q.total, 1180.0));
    assert!(close(q.gst, 180.0));
    assert!(q.coupon_code.is_none());
}

#[test]
fn quote_propagates_bad_rate() {
    let err = checkout_quote(&plan(100.0), None, GstSettings { rate: 150.0, inclusive: false }, today()).unwrap_err();
    assert_eq!(err, BillingError::InvalidRate(150.0));
}
