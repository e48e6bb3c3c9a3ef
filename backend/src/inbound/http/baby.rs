//! Portrait API handlers.
//!
//! ```text
//! POST /api/baby/generate       {"name":"Emma"}
//! POST /api/baby/age-progress   {"image_id":"…","name":"Emma","age_group":"teen"}
//! POST /api/baby/watermark      {"image_data":"…","name":"Emma","age":"Teen"}
//! GET  /api/baby/{image_id}
//! ```
//!
//! The three POST endpoints answer `200` with a `success` envelope for every
//! handled outcome, so clients branch on `success` and `error_code` rather
//! than on HTTP status. Malformed JSON is still rejected by actix with `400`.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    AgeProgressRequest, BabyRecordSummary, GenerateBabyRequest, VariantSource, WatermarkRequest,
};
use crate::domain::{AgeGroup, Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::redact_if_internal;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/baby/generate`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateBabyBody {
    /// Subject name; trimmed, 1 to 64 characters.
    #[schema(example = "Emma")]
    pub name: String,
}

/// Response envelope for `POST /api/baby/generate`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateBabyResponse {
    /// Whether a record was created.
    pub success: bool,
    /// New record identifier; empty on failure.
    pub image_id: String,
    /// Base64 baseline portrait.
    pub image_data: Option<String>,
    /// Failure message.
    pub error: Option<String>,
    /// Failure category.
    pub error_code: Option<ErrorCode>,
}

/// Request body for `POST /api/baby/age-progress`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AgeProgressBody {
    /// Record identifier returned by `generate`.
    pub image_id: String,
    /// Subject name used in the prompt.
    pub name: String,
    /// One of `baby`, `child`, `teen`, `adult`.
    #[schema(example = "teen")]
    pub age_group: String,
    /// Optional free-text description of the subject's features.
    #[serde(default)]
    pub reference_description: Option<String>,
}

/// Response envelope for `POST /api/baby/age-progress`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AgeProgressResponse {
    /// Whether an image is returned.
    pub success: bool,
    /// Base64 aged portrait.
    pub image_data: Option<String>,
    /// Age group as requested.
    pub age_group: String,
    /// Whether the image came from the record cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    /// Failure message.
    pub error: Option<String>,
    /// Failure category.
    pub error_code: Option<ErrorCode>,
}

/// Request body for `POST /api/baby/watermark`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WatermarkBody {
    /// Base64 image.
    pub image_data: String,
    /// Subject name.
    pub name: String,
    /// Age label rendered after the name.
    #[schema(example = "Teen")]
    pub age: String,
}

/// Response envelope for `POST /api/baby/watermark`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WatermarkResponse {
    /// Always `true`; compositing failures echo the input instead.
    pub success: bool,
    /// Labelled image, or the original payload when compositing failed.
    pub watermarked_image: Option<String>,
    /// Whether the label was actually drawn.
    pub watermark_applied: bool,
    /// Failure message.
    pub error: Option<String>,
    /// Failure category.
    pub error_code: Option<ErrorCode>,
}

/// Record summary returned by `GET /api/baby/{image_id}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct BabyRecordResponse {
    /// Record identifier.
    pub id: String,
    /// Subject name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Age groups with a cached variant.
    pub age_groups: Vec<AgeGroup>,
}

impl From<BabyRecordSummary> for BabyRecordResponse {
    fn from(summary: BabyRecordSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name.to_string(),
            created_at: summary.created_at,
            age_groups: summary.age_groups,
        }
    }
}

fn failure_fields(error: &Error) -> (Option<String>, Option<ErrorCode>) {
    let visible = redact_if_internal(error);
    (Some(visible.message().to_owned()), Some(visible.code()))
}

/// Generate a baseline portrait for a name and store a new record.
#[utoipa::path(
    post,
    path = "/api/baby/generate",
    request_body = GenerateBabyBody,
    responses(
        (status = 200, description = "Outcome envelope", body = GenerateBabyResponse),
        (status = 400, description = "Malformed JSON body")
    ),
    tags = ["baby"],
    operation_id = "generateBaby"
)]
#[post("/baby/generate")]
pub async fn generate_baby(
    state: web::Data<HttpState>,
    payload: web::Json<GenerateBabyBody>,
) -> HttpResponse {
    let GenerateBabyBody { name } = payload.into_inner();
    let body = match state
        .portraits
        .generate_baby(GenerateBabyRequest { name })
        .await
    {
        Ok(generated) => GenerateBabyResponse {
            success: true,
            image_id: generated.id.to_string(),
            image_data: Some(generated.image.into_string()),
            error: None,
            error_code: None,
        },
        Err(error) => {
            let (error, error_code) = failure_fields(&error);
            GenerateBabyResponse {
                success: false,
                image_id: String::new(),
                image_data: None,
                error,
                error_code,
            }
        }
    };
    HttpResponse::Ok().json(body)
}

/// Return the cached variant for an age group, generating it on a miss.
#[utoipa::path(
    post,
    path = "/api/baby/age-progress",
    request_body = AgeProgressBody,
    responses(
        (status = 200, description = "Outcome envelope", body = AgeProgressResponse),
        (status = 400, description = "Malformed JSON body")
    ),
    tags = ["baby"],
    operation_id = "ageProgress"
)]
#[post("/baby/age-progress")]
pub async fn age_progress(
    state: web::Data<HttpState>,
    payload: web::Json<AgeProgressBody>,
) -> HttpResponse {
    let AgeProgressBody {
        image_id,
        name,
        age_group,
        reference_description,
    } = payload.into_inner();
    let request = AgeProgressRequest {
        record_id: image_id,
        name,
        age_group: age_group.clone(),
        reference_description,
    };

    let body = match state.portraits.generate_age_variant(request).await {
        Ok(variant) => AgeProgressResponse {
            success: true,
            image_data: Some(variant.image.into_string()),
            age_group: variant.age_group.as_str().to_owned(),
            cached: Some(variant.source == VariantSource::Cache),
            error: None,
            error_code: None,
        },
        Err(error) => {
            let (error, error_code) = failure_fields(&error);
            AgeProgressResponse {
                success: false,
                image_data: None,
                age_group,
                cached: None,
                error,
                error_code,
            }
        }
    };
    HttpResponse::Ok().json(body)
}

/// Burn `"{name} - {age}"` into an image.
#[utoipa::path(
    post,
    path = "/api/baby/watermark",
    request_body = WatermarkBody,
    responses(
        (status = 200, description = "Labelled or original image", body = WatermarkResponse),
        (status = 400, description = "Malformed JSON body")
    ),
    tags = ["baby"],
    operation_id = "watermark"
)]
#[post("/baby/watermark")]
pub async fn watermark(
    state: web::Data<HttpState>,
    payload: web::Json<WatermarkBody>,
) -> HttpResponse {
    let WatermarkBody {
        image_data,
        name,
        age,
    } = payload.into_inner();
    let outcome = state
        .portraits
        .watermark(WatermarkRequest {
            image_base64: image_data,
            name,
            age_label: age,
        })
        .await;

    HttpResponse::Ok().json(WatermarkResponse {
        success: true,
        watermarked_image: Some(outcome.image_base64),
        watermark_applied: outcome.applied,
        error: None,
        error_code: None,
    })
}

/// Summarise a stored record.
#[utoipa::path(
    get,
    path = "/api/baby/{image_id}",
    params(("image_id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record summary", body = BabyRecordResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Unknown record", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["baby"],
    operation_id = "getBabyRecord"
)]
#[get("/baby/{image_id}")]
pub async fn get_record(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BabyRecordResponse>> {
    let summary = state.records.get_record(&path.into_inner()).await?;
    Ok(web::Json(summary.into()))
}

#[cfg(test)]
#[path = "baby_tests.rs"]
mod tests;
