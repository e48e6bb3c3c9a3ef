//! HTTP contract of the portrait endpoints, driven through actix's test
//! service with the real pipeline behind it.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use babygen::Trace;
use babygen::domain::ports::{BabyPortraitCommand, BabyRecordQuery};
use babygen::inbound::http::baby::{age_progress, generate_baby, get_record, watermark};
use babygen::inbound::http::state::HttpState;
use serde_json::{Value, json};
use support::Pipeline;

fn http_state(pipeline: &Pipeline) -> web::Data<HttpState> {
    let portraits: Arc<dyn BabyPortraitCommand> = pipeline.service.clone();
    let records: Arc<dyn BabyRecordQuery> = pipeline.service.clone();
    web::Data::new(HttpState::new(portraits, records))
}

macro_rules! app {
    ($pipeline:expr) => {
        test::init_service(
            App::new()
                .app_data(http_state(&$pipeline))
                .wrap(Trace)
                .service(
                    web::scope("/api")
                        .service(generate_baby)
                        .service(age_progress)
                        .service(watermark)
                        .service(get_record),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn generate_age_and_lookup_flow() {
    let pipeline = Pipeline::trusted();
    let app = app!(pipeline);

    let generated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/baby/generate")
            .set_json(json!({ "name": "Emma" }))
            .to_request(),
    )
    .await;
    assert_eq!(generated["success"], json!(true));
    let id = generated["image_id"].as_str().expect("id").to_owned();

    let mut payloads = Vec::new();
    for _ in 0..2 {
        let aged: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/baby/age-progress")
                .set_json(json!({ "image_id": id, "name": "Emma", "age_group": "baby" }))
                .to_request(),
        )
        .await;
        assert_eq!(aged["success"], json!(true));
        payloads.push(aged);
    }

    assert_eq!(payloads[0]["image_data"], payloads[1]["image_data"]);
    assert_eq!(payloads[0]["cached"], json!(false));
    assert_eq!(payloads[1]["cached"], json!(true));
    assert_eq!(pipeline.capability.calls(), 2);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/baby/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(response).await;
    assert_eq!(summary["age_groups"], json!(["baby"]));
}

#[actix_web::test]
async fn invalid_age_group_envelope() {
    let pipeline = Pipeline::trusted();
    let app = app!(pipeline);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/baby/age-progress")
            .set_json(json!({
                "image_id": "00000000-0000-4000-8000-000000000000",
                "name": "Emma",
                "age_group": "unknown"
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["age_group"], json!("unknown"));
    assert_eq!(body["error_code"], json!("invalid_request"));
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.contains("Invalid age group"))
    );
    assert_eq!(pipeline.upstream_calls(), 0);
}

#[actix_web::test]
async fn watermark_with_malformed_payload_echoes_input() {
    let pipeline = Pipeline::trusted();
    let app = app!(pipeline);

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/baby/watermark")
            .set_json(json!({ "image_data": "%%%", "name": "Emma", "age": "Baby" }))
            .to_request(),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["watermarked_image"], json!("%%%"));
    assert_eq!(body["watermark_applied"], json!(false));
}

#[actix_web::test]
async fn unknown_record_lookup_is_404_with_trace_id() {
    let pipeline = Pipeline::trusted();
    let app = app!(pipeline);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/baby/00000000-0000-4000-8000-000000000000")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], json!("not_found"));
    assert_eq!(body["traceId"].as_str().map(str::to_owned), header);
}
