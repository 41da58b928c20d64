//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

async fn decode_response(error: Error, expected_status: StatusCode) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("busy"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("unexpected conflict on <unknown>: accounts_pkey")
        .with_details(json!({"secret": "x"}));

    let payload = decode_response(error, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("User already registered")
        .with_details(json!({"field": "phone", "code": "phone_registered"}));

    let payload = decode_response(error, StatusCode::CONFLICT).await;
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.message(), "User already registered");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "phone", "code": "phone_registered"}))
    );
}

#[rstest]
fn redaction_leaves_client_errors_untouched() {
    let error = Error::service_unavailable("retry later");
    assert_eq!(redact_if_internal(&error), error);
}
