//! Tests for the domain error payload and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::generation(Error::generation_failed("no image"), ErrorCode::GenerationFailed)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::not_found("gone") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_with_camel_case_and_skips_empty_fields() {
    let error = Error::invalid_request("Invalid age group: toddler");
    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({ "code": "invalid_request", "message": "Invalid age group: toddler" })
    );
}

#[rstest]
fn details_and_trace_id_round_trip_through_json(expected_trace_id: String) {
    let error = Error::generation_failed("no trusted url")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "ageGroup": "teen" }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value.get("traceId").and_then(|v| v.as_str()),
        Some(expected_trace_id.as_str())
    );

    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::not_found("Baby image not found").to_string(), "Baby image not found");
}
