//! Diesel table definitions for the portrait store.
//!
//! Kept in sync with `backend/migrations` by hand.

diesel::table! {
    /// One row per generated subject.
    baby_records (id) {
        /// Record identifier.
        id -> Uuid,
        /// Subject display name.
        name -> Text,
        /// Base64 baseline portrait.
        original_image -> Text,
        /// Object mapping age group keys to base64 portraits.
        age_versions -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
