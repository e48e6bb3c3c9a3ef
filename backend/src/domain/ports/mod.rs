//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod baby_portrait_command;
mod baby_record_repository;
mod image_generation;
mod media_fetcher;

pub use baby_portrait_command::{
    AgeProgressRequest, AgeVariant, BabyPortraitCommand, BabyRecordQuery, BabyRecordSummary,
    GenerateBabyRequest, GeneratedBaby, VariantSource, WatermarkRequest, WatermarkedImage,
};
#[cfg(test)]
pub use baby_portrait_command::{MockBabyPortraitCommand, MockBabyRecordQuery};
#[cfg(test)]
pub use baby_record_repository::MockBabyRecordRepository;
pub use baby_record_repository::{BabyRecordRepository, BabyRecordRepositoryError};
#[cfg(test)]
pub use image_generation::MockImageGenerationCapability;
pub use image_generation::{
    CapabilityMetadata, CapabilityResponse, ImageGenerationCapability, ImageGenerationError,
};
pub use media_fetcher::{FIXTURE_PNG, MediaFetchError, MediaFetcher};
#[cfg(test)]
pub use media_fetcher::MockMediaFetcher;
