//! PostgreSQL-backed `BabyRecordRepository` using Diesel.
//!
//! Age variants live in a JSONB object column. Reads of a single variant use
//! `->>` and writes use `jsonb_set`, so only the targeted key is touched.

use std::collections::BTreeMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::ports::{BabyRecordRepository, BabyRecordRepositoryError};
use crate::domain::{AgeGroup, BabyName, BabyRecord, BabyRecordId, ImagePayload};

use super::models::{AgeVersionRow, BabyRecordRow, NewBabyRecordRow};
use super::pool::{DbPool, PoolError};
use super::schema::baby_records;

const SELECT_AGE_VERSION: &str =
    "SELECT age_versions ->> $1 AS image FROM baby_records WHERE id = $2";
const SET_AGE_VERSION: &str = "UPDATE baby_records \
     SET age_versions = jsonb_set(age_versions, ARRAY[$1], to_jsonb($2::text), true) \
     WHERE id = $3";

/// Diesel-backed implementation of the `BabyRecordRepository` port.
#[derive(Clone)]
pub struct DieselBabyRecordRepository {
    pool: DbPool,
}

impl DieselBabyRecordRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BabyRecordRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BabyRecordRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> BabyRecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BabyRecordRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => {
            BabyRecordRepositoryError::query("database query error")
        }
        _ => BabyRecordRepositoryError::query("database error"),
    }
}

fn map_insert_error(error: diesel::result::Error, id: &BabyRecordId) -> BabyRecordRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            BabyRecordRepositoryError::duplicate_id(id.to_string())
        }
        other => map_diesel_error(other),
    }
}

fn age_versions_to_json(age_versions: &BTreeMap<AgeGroup, ImagePayload>) -> Value {
    Value::Object(
        age_versions
            .iter()
            .map(|(group, image)| (group.as_str().to_owned(), Value::from(image.as_str())))
            .collect::<Map<_, _>>(),
    )
}

fn age_versions_from_json(
    id: &BabyRecordId,
    value: Value,
) -> BTreeMap<AgeGroup, ImagePayload> {
    let Value::Object(entries) = value else {
        warn!(record_id = %id, "age_versions is not an object; treating as empty");
        return BTreeMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(key, image)| {
            let group = key.parse::<AgeGroup>().ok();
            let payload = image
                .as_str()
                .and_then(|raw| ImagePayload::new(raw).ok());
            match (group, payload) {
                (Some(group), Some(payload)) => Some((group, payload)),
                _ => {
                    warn!(record_id = %id, key, "skipping unreadable age version");
                    None
                }
            }
        })
        .collect()
}

fn row_to_record(row: BabyRecordRow) -> Result<BabyRecord, BabyRecordRepositoryError> {
    let id = BabyRecordId::from_uuid(row.id);
    let name = BabyName::new(&row.name).map_err(|err| {
        BabyRecordRepositoryError::query(format!("stored record {id} has invalid name: {err}"))
    })?;
    let original_image = ImagePayload::new(row.original_image).map_err(|err| {
        BabyRecordRepositoryError::query(format!("stored record {id} has invalid image: {err}"))
    })?;
    Ok(BabyRecord {
        age_versions: age_versions_from_json(&id, row.age_versions),
        id,
        name,
        original_image,
        created_at: row.created_at,
    })
}

#[async_trait]
impl BabyRecordRepository for DieselBabyRecordRepository {
    async fn insert(&self, record: &BabyRecord) -> Result<(), BabyRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBabyRecordRow {
            id: *record.id.as_uuid(),
            name: record.name.as_ref(),
            original_image: record.original_image.as_str(),
            age_versions: age_versions_to_json(&record.age_versions),
            created_at: record.created_at,
        };

        diesel::insert_into(baby_records::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, &record.id))
    }

    async fn find_by_id(
        &self,
        id: &BabyRecordId,
    ) -> Result<Option<BabyRecord>, BabyRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BabyRecordRow> = baby_records::table
            .filter(baby_records::id.eq(id.as_uuid()))
            .select(BabyRecordRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_record).transpose()
    }

    async fn find_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
    ) -> Result<Option<ImagePayload>, BabyRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AgeVersionRow> = diesel::sql_query(SELECT_AGE_VERSION)
            .bind::<Text, _>(age_group.as_str())
            .bind::<SqlUuid, _>(*id.as_uuid())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row
            .and_then(|row| row.image)
            .and_then(|image| ImagePayload::new(image).ok()))
    }

    async fn set_age_version(
        &self,
        id: &BabyRecordId,
        age_group: AgeGroup,
        image: &ImagePayload,
    ) -> Result<(), BabyRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::sql_query(SET_AGE_VERSION)
            .bind::<Text, _>(age_group.as_str())
            .bind::<Text, _>(image.as_str())
            .bind::<SqlUuid, _>(*id.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(BabyRecordRepositoryError::not_found(id.to_string()));
        }
        Ok(())
    }
}
