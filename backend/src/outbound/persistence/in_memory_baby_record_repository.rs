//! Process-local `BabyRecordRepository` used when no database is configured.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{BabyRecordRepository, BabyRecordRepositoryError};
use crate::domain::{AgeGroup, BabyRecord, BabyRecordId, ImagePayload};

/// Records held in a shared map. Cloning shares the underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryBabyRecordRepository {
    records: Arc<RwLock<HashMap<BabyRecordId, BabyRecord>>>,
}

impl InMemoryBabyRecordRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl BabyRecordRepository for InMemoryBabyRecordRepository {
    async fn insert(&self, record: &BabyRecord) -> Result<(), BabyRecordRepositoryError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(BabyRecordRepositoryError::duplicate_id(record.id.to_string()));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &BabyRecordId,
    ) -> Result<Option<BabyRecord>, BabyRecordRepositoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn find_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
    ) -> Result<Option<ImagePayload>, BabyRecordRepositoryError> {
        Ok(self
            .records
            .read()
            .await
            .get(id)
            .and_then(|record| record.cached_age(age_group).cloned()))
    }

    async fn set_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
        image: &ImagePayload,
    ) -> Result<(), BabyRecordRepositoryError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| BabyRecordRepositoryError::not_found(id.to_string()))?;
        record.age_versions.insert(age_group, image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BabyName;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> BabyRecord {
        BabyRecord::new(
            BabyRecordId::random(),
            BabyName::new("Noah").expect("valid name"),
            ImagePayload::encode(b"original"),
            Utc::now(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_records_can_be_found(record: BabyRecord) {
        let store = InMemoryBabyRecordRepository::new();
        store.insert(&record).await.expect("insert");

        let found = store.find_by_id(&record.id).await.expect("lookup");

        assert_eq!(found, Some(record));
        assert_eq!(store.len().await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_ids_are_rejected(record: BabyRecord) {
        let store = InMemoryBabyRecordRepository::new();
        store.insert(&record).await.expect("first insert");

        let error = store.insert(&record).await.expect_err("duplicate");

        assert_eq!(
            error,
            BabyRecordRepositoryError::duplicate_id(record.id.to_string())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn age_versions_update_one_group(record: BabyRecord) {
        let store = InMemoryBabyRecordRepository::new();
        store.insert(&record).await.expect("insert");
        let teen = ImagePayload::encode(b"teen");

        store
            .set_age_version(&record.id, AgeGroup::Teen, &teen)
            .await
            .expect("update");

        assert_eq!(
            store
                .find_age_version(&record.id, AgeGroup::Teen)
                .await
                .expect("lookup"),
            Some(teen)
        );
        assert_eq!(
            store
                .find_age_version(&record.id, AgeGroup::Adult)
                .await
                .expect("lookup"),
            None
        );
    }

    #[rstest]
    #[tokio::test]
    async fn later_writes_win(record: BabyRecord) {
        let store = InMemoryBabyRecordRepository::new();
        store.insert(&record).await.expect("insert");
        let second = ImagePayload::encode(b"second");

        for image in [ImagePayload::encode(b"first"), second.clone()] {
            store
                .set_age_version(&record.id, AgeGroup::Baby, &image)
                .await
                .expect("update");
        }

        let stored = store.find_by_id(&record.id).await.expect("lookup");
        assert_eq!(
            stored.and_then(|r| r.cached_age(AgeGroup::Baby).cloned()),
            Some(second)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn updating_missing_records_is_not_found() {
        let store = InMemoryBabyRecordRepository::new();
        let id = BabyRecordId::random();

        let error = store
            .set_age_version(&id, AgeGroup::Child, &ImagePayload::encode(b"x"))
            .await
            .expect_err("missing record");

        assert_eq!(error, BabyRecordRepositoryError::not_found(id.to_string()));
        assert!(store.is_empty().await);
    }
}
