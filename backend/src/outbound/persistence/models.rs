//! Diesel row structs for the `baby_records` table.
//!
//! These are internal to the persistence adapter and never cross into the
//! domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use serde_json::Value;
use uuid::Uuid;

use super::schema::baby_records;

/// Row struct for reading from the `baby_records` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = baby_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BabyRecordRow {
    pub id: Uuid,
    pub name: String,
    pub original_image: String,
    pub age_versions: Value,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = baby_records)]
pub(crate) struct NewBabyRecordRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub original_image: &'a str,
    pub age_versions: Value,
    pub created_at: DateTime<Utc>,
}

/// Single `age_versions` entry extracted with `->>`.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct AgeVersionRow {
    #[diesel(sql_type = Nullable<Text>)]
    pub image: Option<String>,
}
