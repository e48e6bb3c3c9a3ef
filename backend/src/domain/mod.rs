//! Domain primitives, services and ports for the portrait pipeline.
//!
//! Purpose: turn a name into a stored portrait record, lazily add
//! age-progressed variants to it, and composite labels onto images. Adapters
//! live in `inbound` and `outbound`; this module owns the contracts.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - AgeGroup, BabyRecord and its value types.
//! - GenerationOrchestrator, BabyRecordGateway, BabyPortraitService.
//! - watermark: the label compositor.
//! - ports: driving and driven port traits.

pub mod age_group;
pub mod baby_record;
pub mod baby_service;
pub mod error;
pub mod generation;
pub mod media_url;
pub mod ports;
pub mod prompts;
pub mod record_gateway;
pub mod trace_id;
pub mod watermark;

pub use self::age_group::{AgeGroup, ParseAgeGroupError};
pub use self::baby_record::{
    BABY_NAME_MAX, BabyName, BabyRecord, BabyRecordId, BabyRecordValidationError, ImagePayload,
};
pub use self::baby_service::BabyPortraitService;
pub use self::error::{Error, ErrorCode};
pub use self::generation::{GenerationFailure, GenerationOrchestrator, GenerationResult};
pub use self::media_url::{extract_trusted_media_url, is_trusted_host};
pub use self::record_gateway::BabyRecordGateway;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use babygen::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("Baby image not found"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
