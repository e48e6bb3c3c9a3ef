//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI at `/docs` in debug builds.

use utoipa::OpenApi;

use crate::domain::{AgeGroup, Error, ErrorCode};
use crate::inbound::http::baby::{
    AgeProgressBody, AgeProgressResponse, BabyRecordResponse, GenerateBabyBody,
    GenerateBabyResponse, WatermarkBody, WatermarkResponse,
};

/// OpenAPI document for the portrait API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "babygen API",
        description = "Name-to-portrait generation with cached age progression and watermarking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::baby::generate_baby,
        crate::inbound::http::baby::age_progress,
        crate::inbound::http::baby::watermark,
        crate::inbound::http::baby::get_record,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AgeGroup,
        GenerateBabyBody,
        GenerateBabyResponse,
        AgeProgressBody,
        AgeProgressResponse,
        WatermarkBody,
        WatermarkResponse,
        BabyRecordResponse,
    )),
    tags(
        (name = "baby", description = "Portrait generation and labelling"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
