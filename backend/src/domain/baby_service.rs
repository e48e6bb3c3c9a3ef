//! Portrait pipeline service.
//!
//! Implements the driving ports by composing the generation orchestrator,
//! the record gateway and the watermark compositor. Caller input is
//! validated before any collaborator is touched.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Span, error, info};

use crate::domain::ports::{
    AgeProgressRequest, AgeVariant, BabyPortraitCommand, BabyRecordQuery, BabyRecordSummary,
    GenerateBabyRequest, GeneratedBaby, VariantSource, WatermarkRequest, WatermarkedImage,
};
use crate::domain::watermark::{WatermarkCompositor, watermark_label};
use crate::domain::{
    AgeGroup, BabyName, BabyRecordGateway, BabyRecordId, BabyRecordValidationError, Error,
    GenerationOrchestrator,
};

const BABY_GENERATION_FAILED: &str = "Failed to generate baby image";
const AGED_GENERATION_FAILED: &str = "Failed to generate aged image";

/// Service implementing [`BabyPortraitCommand`] and [`BabyRecordQuery`].
#[derive(Clone)]
pub struct BabyPortraitService {
    orchestrator: GenerationOrchestrator,
    records: BabyRecordGateway,
    compositor: Arc<WatermarkCompositor>,
}

impl BabyPortraitService {
    /// Create a service from its collaborators.
    pub fn new(
        orchestrator: GenerationOrchestrator,
        records: BabyRecordGateway,
        compositor: WatermarkCompositor,
    ) -> Self {
        Self {
            orchestrator,
            records,
            compositor: Arc::new(compositor),
        }
    }

    fn validation_error(field: &str, err: &BabyRecordValidationError) -> Error {
        Error::invalid_request(err.to_string())
            .with_details(serde_json::json!({ "field": field }))
    }

    fn parse_id(raw: &str) -> Result<BabyRecordId, Error> {
        BabyRecordId::new(raw).map_err(|err| Self::validation_error("image_id", &err))
    }

    fn parse_name(raw: &str) -> Result<BabyName, Error> {
        BabyName::new(raw).map_err(|err| Self::validation_error("name", &err))
    }
}

#[async_trait]
impl BabyPortraitCommand for BabyPortraitService {
    async fn generate_baby(&self, request: GenerateBabyRequest) -> Result<GeneratedBaby, Error> {
        let name = Self::parse_name(&request.name)?;
        let image = self
            .orchestrator
            .generate_original(&name)
            .await
            .map_err(|failure| failure.into_error(BABY_GENERATION_FAILED))?;
        let id = self.records.create(name, image.clone()).await?;
        info!(record_id = %id, "baby portrait generated");
        Ok(GeneratedBaby { id, image })
    }

    async fn generate_age_variant(
        &self,
        request: AgeProgressRequest,
    ) -> Result<AgeVariant, Error> {
        let id = Self::parse_id(&request.record_id)?;
        let age_group = request
            .age_group
            .parse::<AgeGroup>()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let name = Self::parse_name(&request.name)?;

        if let Some(image) = self.records.get_cached_age(&id, age_group).await? {
            info!(record_id = %id, %age_group, "age variant served from cache");
            return Ok(AgeVariant {
                age_group,
                image,
                source: VariantSource::Cache,
            });
        }

        // Only generate for records that exist.
        self.records.get(&id).await?;

        let image = self
            .orchestrator
            .generate_aged_for(&name, age_group, request.reference_description.as_deref())
            .await
            .map_err(|failure| failure.into_error(AGED_GENERATION_FAILED))?;
        self.records.set_age(&id, age_group, &image).await?;
        info!(record_id = %id, %age_group, "age variant generated");
        Ok(AgeVariant {
            age_group,
            image,
            source: VariantSource::Generated,
        })
    }

    async fn watermark(&self, request: WatermarkRequest) -> WatermarkedImage {
        let label = watermark_label(request.name.trim(), request.age_label.trim());
        let compositor = Arc::clone(&self.compositor);
        let payload = request.image_base64.clone();
        let span = Span::current();

        let composited = tokio::task::spawn_blocking(move || {
            span.in_scope(|| compositor.apply_or_original(&payload, &label))
        })
        .await;

        composited.unwrap_or_else(|err| {
            error!(error = %err, "watermark task failed; returning original image");
            WatermarkedImage {
                image_base64: request.image_base64,
                applied: false,
            }
        })
    }
}

#[async_trait]
impl BabyRecordQuery for BabyPortraitService {
    async fn get_record(&self, record_id: &str) -> Result<BabyRecordSummary, Error> {
        let id = Self::parse_id(record_id)?;
        let record = self.records.get(&id).await?;
        Ok(BabyRecordSummary {
            age_groups: record.cached_groups(),
            id: record.id,
            name: record.name,
            created_at: record.created_at,
        })
    }
}

#[cfg(test)]
#[path = "baby_service_tests.rs"]
mod tests;
