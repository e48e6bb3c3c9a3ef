//! Port for baby record persistence.
//!
//! The contract mirrors a document store: insert a whole record, look one up
//! by id, and patch a single `age_versions.<group>` field path in place.

use async_trait::async_trait;

use crate::domain::{AgeGroup, BabyRecord, BabyRecordId, ImagePayload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by baby record repository adapters.
    pub enum BabyRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "baby record repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "baby record repository query failed: {message}",
        /// An insert collided with an existing identifier.
        DuplicateId { id: String } =>
            "baby record {id} already exists",
        /// A field-path update targeted a record that does not exist.
        NotFound { id: String } =>
            "baby record {id} not found",
    }
}

/// Port for storing and patching baby records.
///
/// # Field-path updates
///
/// [`BabyRecordRepository::set_age_version`] must only touch
/// `age_versions[age_group]`. It never modifies `original_image`, `name`,
/// `created_at`, or other age groups. Concurrent writers for the same key are
/// resolved last-writer-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BabyRecordRepository: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, record: &BabyRecord) -> Result<(), BabyRecordRepositoryError>;

    /// Fetch a record by id, returning `None` when absent.
    async fn find_by_id(
        &self,
        id: &BabyRecordId,
    ) -> Result<Option<BabyRecord>, BabyRecordRepositoryError>;

    /// Fetch only the cached variant for one age group.
    ///
    /// Returns `None` both for a missing record and a missing variant.
    async fn find_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
    ) -> Result<Option<ImagePayload>, BabyRecordRepositoryError>;

    /// Set `age_versions[age_group]` on an existing record.
    async fn set_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
        image: &ImagePayload,
    ) -> Result<(), BabyRecordRepositoryError>;
}
