//! Handler tests for the portrait endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    AgeVariant, GeneratedBaby, MockBabyPortraitCommand, MockBabyRecordQuery, WatermarkedImage,
};
use crate::domain::{BabyName, BabyRecordId, ImagePayload};

fn state(portraits: MockBabyPortraitCommand, records: MockBabyRecordQuery) -> HttpState {
    HttpState::new(Arc::new(portraits), Arc::new(records))
}

async fn post_json(state: HttpState, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api")
                    .service(generate_baby)
                    .service(age_progress)
                    .service(watermark)
                    .service(get_record),
            ),
    )
    .await;
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[actix_web::test]
async fn generate_returns_id_and_image() {
    let id = BabyRecordId::random();
    let mut portraits = MockBabyPortraitCommand::new();
    portraits
        .expect_generate_baby()
        .withf(|request| request.name == "Emma")
        .times(1)
        .return_once(move |_| {
            Ok(GeneratedBaby {
                id,
                image: ImagePayload::encode(b"png"),
            })
        });

    let (status, body) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/generate",
        json!({ "name": "Emma" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["image_id"], json!(id.to_string()));
    assert_eq!(body["image_data"], json!("cG5n"));
    assert_eq!(body["error"], Value::Null);
}

#[rstest]
#[case(Error::generation_failed("Failed to generate baby image"), "generation_failed", "Failed to generate baby image")]
#[case(Error::invalid_request("name must not be empty"), "invalid_request", "name must not be empty")]
#[case(Error::internal("pool exploded"), "internal_error", "Internal server error")]
#[actix_web::test]
async fn generate_failures_use_the_envelope(
    #[case] error: Error,
    #[case] code: &str,
    #[case] message: &str,
) {
    let mut portraits = MockBabyPortraitCommand::new();
    portraits
        .expect_generate_baby()
        .times(1)
        .return_once(move |_| Err(error));

    let (status, body) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/generate",
        json!({ "name": "Emma" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["image_id"], json!(""));
    assert_eq!(body["error_code"], json!(code));
    assert_eq!(body["error"], json!(message));
}

#[actix_web::test]
async fn malformed_json_is_rejected_before_the_service() {
    let mut portraits = MockBabyPortraitCommand::new();
    portraits.expect_generate_baby().never();

    let (status, _) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/generate",
        json!({ "nom": "Emma" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[case(VariantSource::Cache, true)]
#[case(VariantSource::Generated, false)]
#[actix_web::test]
async fn age_progress_reports_cache_hits(#[case] source: VariantSource, #[case] cached: bool) {
    let mut portraits = MockBabyPortraitCommand::new();
    portraits
        .expect_generate_age_variant()
        .withf(|request| {
            request.record_id == "abc" && request.age_group == "teen" && request.name == "Emma"
        })
        .times(1)
        .return_once(move |_| {
            Ok(AgeVariant {
                age_group: AgeGroup::Teen,
                image: ImagePayload::encode(b"teen"),
                source,
            })
        });

    let (_, body) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/age-progress",
        json!({ "image_id": "abc", "name": "Emma", "age_group": "teen" }),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["age_group"], json!("teen"));
    assert_eq!(body["image_data"], json!("dGVlbg=="));
    assert_eq!(body["cached"], json!(cached));
}

#[actix_web::test]
async fn age_progress_echoes_the_requested_group_on_failure() {
    let mut portraits = MockBabyPortraitCommand::new();
    portraits
        .expect_generate_age_variant()
        .times(1)
        .return_once(|_| Err(Error::invalid_request("Invalid age group: toddler")));

    let (status, body) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/age-progress",
        json!({ "image_id": "abc", "name": "Emma", "age_group": "toddler" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["age_group"], json!("toddler"));
    assert_eq!(body["error"], json!("Invalid age group: toddler"));
    assert_eq!(body["error_code"], json!("invalid_request"));
    assert!(body.get("cached").is_none());
}

#[rstest]
#[case(true)]
#[case(false)]
#[actix_web::test]
async fn watermark_always_succeeds(#[case] applied: bool) {
    let mut portraits = MockBabyPortraitCommand::new();
    portraits
        .expect_watermark()
        .withf(|request| request.name == "Emma" && request.age_label == "Baby")
        .times(1)
        .return_once(move |request| WatermarkedImage {
            image_base64: request.image_base64,
            applied,
        });

    let (_, body) = post_json(
        state(portraits, MockBabyRecordQuery::new()),
        "/api/baby/watermark",
        json!({ "image_data": "not base64", "name": "Emma", "age": "Baby" }),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["watermarked_image"], json!("not base64"));
    assert_eq!(body["watermark_applied"], json!(applied));
}

async fn get_json(state: HttpState, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api").service(get_record)),
    )
    .await;
    let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[actix_web::test]
async fn get_record_returns_summary() {
    let id = BabyRecordId::random();
    let created_at = Utc
        .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp");
    let mut records = MockBabyRecordQuery::new();
    records
        .expect_get_record()
        .withf(move |raw| raw == id.to_string())
        .times(1)
        .return_once(move |_| {
            Ok(BabyRecordSummary {
                id,
                name: BabyName::new("Emma").expect("valid name"),
                created_at,
                age_groups: vec![AgeGroup::Baby, AgeGroup::Adult],
            })
        });

    let (status, body) = get_json(
        state(MockBabyPortraitCommand::new(), records),
        &format!("/api/baby/{id}"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id.to_string()));
    assert_eq!(body["name"], json!("Emma"));
    assert_eq!(body["age_groups"], json!(["baby", "adult"]));
}

#[actix_web::test]
async fn get_record_maps_missing_records_to_404() {
    let mut records = MockBabyRecordQuery::new();
    records
        .expect_get_record()
        .times(1)
        .return_once(|_| Err(Error::not_found("Baby image not found")));

    let (status, body) = get_json(
        state(MockBabyPortraitCommand::new(), records),
        "/api/baby/missing",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}
