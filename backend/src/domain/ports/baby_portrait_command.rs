//! Driving ports for the portrait pipeline.
//!
//! Inbound adapters call these traits with raw caller input. Validation,
//! caching and failure isolation live behind them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AgeGroup, BabyName, BabyRecordId, Error, ImagePayload};

/// Input for creating a new record from a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateBabyRequest {
    /// Raw subject name.
    pub name: String,
}

/// A freshly created record and its baseline portrait.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBaby {
    /// Identifier allocated for the new record.
    pub id: BabyRecordId,
    /// Baseline portrait.
    pub image: ImagePayload,
}

/// Input for requesting an age-progressed variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeProgressRequest {
    /// Raw record identifier.
    pub record_id: String,
    /// Raw subject name used in the prompt.
    pub name: String,
    /// Raw age group label.
    pub age_group: String,
    /// Optional description of the subject's features, repeated verbatim in
    /// the prompt to bias towards the same face.
    pub reference_description: Option<String>,
}

/// Where an age variant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSource {
    /// Served from the record's `age_versions` cache.
    Cache,
    /// Generated by this call and written to the cache.
    Generated,
}

/// Result of an age-progression request.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeVariant {
    /// Group the variant belongs to.
    pub age_group: AgeGroup,
    /// Portrait payload.
    pub image: ImagePayload,
    /// Cache hit or fresh generation.
    pub source: VariantSource,
}

/// Input for burning a label into an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkRequest {
    /// Base64 image payload supplied by the caller.
    pub image_base64: String,
    /// Subject name.
    pub name: String,
    /// Age label, e.g. `Teen`.
    pub age_label: String,
}

/// Watermark output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkedImage {
    /// Base64 payload; the unmodified input when compositing failed.
    pub image_base64: String,
    /// Whether the label was actually composited.
    pub applied: bool,
}

/// Read model of a stored record without its image payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct BabyRecordSummary {
    /// Record identifier.
    pub id: BabyRecordId,
    /// Subject name.
    pub name: BabyName,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Groups with a cached variant.
    pub age_groups: Vec<AgeGroup>,
}

/// Driving port for generation, age progression and watermarking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BabyPortraitCommand: Send + Sync {
    /// Generate a baseline portrait for a name and persist a new record.
    async fn generate_baby(&self, request: GenerateBabyRequest) -> Result<GeneratedBaby, Error>;

    /// Return the cached variant for an age group, generating it on a miss.
    async fn generate_age_variant(&self, request: AgeProgressRequest)
    -> Result<AgeVariant, Error>;

    /// Composite `"{name} - {age}"` onto an image. Never fails on bad input;
    /// the original payload is echoed back instead.
    async fn watermark(&self, request: WatermarkRequest) -> WatermarkedImage;
}

/// Driving port for reading stored records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BabyRecordQuery: Send + Sync {
    /// Summarise a stored record.
    async fn get_record(&self, record_id: &str) -> Result<BabyRecordSummary, Error>;
}
