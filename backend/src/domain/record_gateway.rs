//! Record store gateway.
//!
//! Maps pipeline outputs onto the [`BabyRecordRepository`] contract so that
//! services never touch storage semantics directly. Repository failures are
//! converted into domain [`Error`] values here.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, error};

use super::ports::{BabyRecordRepository, BabyRecordRepositoryError};
use super::{AgeGroup, BabyName, BabyRecord, BabyRecordId, Error, ImagePayload};

/// Gateway over the record store.
#[derive(Clone)]
pub struct BabyRecordGateway {
    repository: Arc<dyn BabyRecordRepository>,
    clock: Arc<dyn Clock>,
}

impl BabyRecordGateway {
    /// Create a gateway stamping new records with `clock`.
    pub fn new(repository: Arc<dyn BabyRecordRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Store a new record with an empty `age_versions` map.
    pub async fn create(&self, name: BabyName, image: ImagePayload) -> Result<BabyRecordId, Error> {
        let record = BabyRecord::new(BabyRecordId::random(), name, image, self.clock.utc());
        self.repository
            .insert(&record)
            .await
            .map_err(map_repository_error)?;
        debug!(record_id = %record.id, "baby record created");
        Ok(record.id)
    }

    /// Fetch a record, failing with `not_found` when it is absent.
    pub async fn get(&self, id: &BabyRecordId) -> Result<BabyRecord, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| record_not_found(id))
    }

    /// Look up a cached age variant without side effects.
    pub async fn get_cached_age(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
    ) -> Result<Option<ImagePayload>, Error> {
        self.repository
            .find_age_version(id, age_group)
            .await
            .map_err(map_repository_error)
    }

    /// Patch `age_versions[age_group]` on an existing record.
    pub async fn set_age(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
        image: &ImagePayload,
    ) -> Result<(), Error> {
        self.repository
            .set_age_version(id, age_group, image)
            .await
            .map_err(map_repository_error)?;
        debug!(record_id = %id, %age_group, "age variant stored");
        Ok(())
    }
}

fn record_not_found(id: &BabyRecordId) -> Error {
    Error::not_found("Baby image not found")
        .with_details(serde_json::json!({ "imageId": id.to_string() }))
}

fn map_repository_error(err: BabyRecordRepositoryError) -> Error {
    match err {
        BabyRecordRepositoryError::Connection { message } => {
            error!(%message, "baby record store unavailable");
            Error::service_unavailable("baby record store unavailable")
        }
        BabyRecordRepositoryError::NotFound { id } => {
            Error::not_found("Baby image not found")
                .with_details(serde_json::json!({ "imageId": id }))
        }
        other => {
            error!(error = %other, "baby record store error");
            Error::internal("baby record store error")
        }
    }
}
