use super::*;
use serde_json::json;

#[test]
fn parses_php_style_list_envelope() {
    let body = r#"{"success":"1","records":[{"id":"4","name":"Asha"}],"totalRecords":"21","totalPages":"3"}"#;
    let page = Envelope::parse(body).unwrap().into_result().unwrap().into_page();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.total_records, 21);
    assert_eq!(page.total_pages, 3);
}

#[test]
fn missing_records_is_an_empty_page_not_an_error() {
    let page = Envelope::parse(r#"{"success":true}"#).unwrap().into_result().unwrap().into_page();
    assert!(page.is_empty());
    assert_eq!(page.total_records, 0);
    assert_eq!(page.total_pages, 0);
}

#[test]
fn totals_fall_back_to_record_count() {
    let page = Envelope::parse(r#"{"success":true,"records":[{},{}]}"#).unwrap().into_page();
    assert_eq!(page.total_records, 2);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn rejection_carries_remote_message() {
    let err = Envelope::parse(r#"{"success":false,"message":"Phone already registered"}"#)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert!(matches!(&err, ApiError::Rejected(m) if m == "Phone already registered"));
    assert_eq!(err.user_message(), "Phone already registered");
}

#[test]
fn rejection_without_message_uses_fallback() {
    let err = Envelope::parse(r#"{"success":0}"#).unwrap().into_result().unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[test]
fn non_json_body_is_decode_error() {
    let err = Envelope::parse("<br />\n<b>Fatal error</b>").unwrap_err();
    assert_eq!(err.error_code(), "E_DECODE");
    assert!(err.to_string().contains("Fatal error"));
}

#[test]
fn into_data_requires_payload() {
    let env = Envelope::parse(r#"{"success":true,"data":null}"#).unwrap();
    assert!(env.into_data().is_err());
    let env = Envelope::parse(r#"{"success":true,"data":{"id":9}}"#).unwrap();
    assert_eq!(env.into_data().unwrap(), json!({"id": 9}));
}

#[test]
fn ack_defaults_message() {
    let ack = Envelope::parse(r#"{"success":true}"#).unwrap().into_ack();
    assert_eq!(ack.message, "Saved");
    assert!(ack.data.is_none());
}

#[test]
fn decode_reports_failing_record() {
    #[derive(Debug, serde::Deserialize)]
    struct Strict {
        #[allow(dead_code)]
        id: u32,
    }

    let page = Page { records: vec![json!({"id": 1}), json!({"id": "x"})], total_records: 2, total_pages: 1 };
    let err = page.decode::<Strict>().unwrap_err();
    assert!(err.to_string().contains("record 1"));
}

#[test]
fn page_serializes_with_wire_names() {
    let page: Page<u8> = Page { records: vec![1], total_records: 1, total_pages: 1 };
    let value = serde_json::to_value(&page).unwrap();
    assert_eq!(value, json!({"records": [1], "totalRecords": 1, "totalPages": 1}));
}
