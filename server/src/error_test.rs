use super::*;
use api::models::ValidationError;

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn api_errors_map_to_statuses() {
    assert_eq!(api_error_to_status(&ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
    assert_eq!(api_error_to_status(&ApiError::Rejected("no".into())), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(api_error_to_status(&ApiError::ReadOnly("Plans")), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(api_error_to_status(&ApiError::Transport("reset".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(
        api_error_to_status(&ApiError::Status { status: 500, body: String::new() }),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(api_error_to_status(&ApiError::Decode("eof".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(api_error_to_status(&ApiError::Config("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(api_error_to_status(&ApiError::InvalidId("..".into())), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn unknown_target_is_not_found() {
    let err = AppError::unknown("resource", "invoices");
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.message(), "unknown resource: invoices");
    assert_eq!(err.error_code(), "E_NOT_FOUND");
}

#[test]
fn billing_errors_are_shown_verbatim() {
    let err = AppError::from(BillingError::CouponNotApplicable("Coupon SAVE10 has expired".into()));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err.message(), "Coupon SAVE10 has expired");
}

#[tokio::test]
async fn toast_envelope_shape() {
    let response = AppError::from(ApiError::Rejected("Phone already registered".into())).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Phone already registered");
    assert_eq!(body["code"], "E_REJECTED");
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn transport_details_are_hidden() {
    let response = AppError::from(ApiError::Transport("dns error: api.internal".into())).into_response();
    let body = body_json(response).await;
    assert!(!body["message"].as_str().unwrap().contains("api.internal"));
}

#[tokio::test]
async fn validation_lists_field_issues() {
    let err = ApiError::from(ValidationError::single("phone", "Phone is required"));
    let body = body_json(AppError::from(err).into_response()).await;
    assert_eq!(body["message"], "Phone is required");
    assert_eq!(body["errors"][0]["field"], "phone");
}
