//! Baby record aggregate and its value types.
//!
//! A record is created once with its baseline portrait. Age variants are added
//! one group at a time and are never removed or replaced by the domain.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AgeGroup;

/// Maximum length of a subject name, in characters.
pub const BABY_NAME_MAX: usize = 64;

/// Validation errors raised by the record value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BabyRecordValidationError {
    /// Identifier was not a UUID.
    #[error("record id must be a UUID")]
    InvalidId,
    /// Name was blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeded [`BABY_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound on the character count.
        max: usize,
    },
    /// Image payload was empty.
    #[error("image payload must not be empty")]
    EmptyPayload,
}

/// Opaque record identifier assigned at creation.
///
/// # Examples
/// ```
/// use babygen::domain::BabyRecordId;
///
/// let id = BabyRecordId::random();
/// let parsed = BabyRecordId::new(id.to_string()).expect("round trip");
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BabyRecordId(Uuid);

impl BabyRecordId {
    /// Parse an identifier supplied by a caller.
    pub fn new(id: impl AsRef<str>) -> Result<Self, BabyRecordValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(BabyRecordValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| BabyRecordValidationError::InvalidId)
    }

    /// Allocate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BabyRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of the generated subject, trimmed and length-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BabyName(String);

impl BabyName {
    /// Validate and construct a name.
    ///
    /// # Examples
    /// ```
    /// use babygen::domain::BabyName;
    ///
    /// let name = BabyName::new("  Emma ").expect("valid name");
    /// assert_eq!(name.as_ref(), "Emma");
    /// assert!(BabyName::new("   ").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, BabyRecordValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BabyRecordValidationError::EmptyName);
        }
        if trimmed.chars().count() > BABY_NAME_MAX {
            return Err(BabyRecordValidationError::NameTooLong { max: BABY_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BabyName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BabyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<BabyName> for String {
    fn from(value: BabyName) -> Self {
        value.0
    }
}

impl TryFrom<String> for BabyName {
    type Error = BabyRecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Base64 (standard alphabet, padded) encoded image bytes.
///
/// # Examples
/// ```
/// use babygen::domain::ImagePayload;
///
/// let payload = ImagePayload::encode(b"\x89PNG");
/// assert_eq!(payload.as_str(), "iVBORw==");
/// assert_eq!(payload.decode().expect("valid base64"), b"\x89PNG");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap an already-encoded payload.
    pub fn new(encoded: impl Into<String>) -> Result<Self, BabyRecordValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(BabyRecordValidationError::EmptyPayload);
        }
        Ok(Self(encoded))
    }

    /// Encode raw bytes into a payload.
    pub fn encode(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Decode the payload back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.0.as_bytes())
    }

    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the payload, returning the encoded form.
    pub fn into_string(self) -> String {
        self.0
    }
}

// Payloads run to megabytes; keep log output readable.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} chars)", self.0.len())
    }
}

impl From<ImagePayload> for String {
    fn from(value: ImagePayload) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = BabyRecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One generated subject: the baseline portrait plus cached age variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyRecord {
    /// Identifier assigned at creation.
    pub id: BabyRecordId,
    /// Subject display name.
    pub name: BabyName,
    /// Baseline portrait, set exactly once.
    pub original_image: ImagePayload,
    /// Cached age-progressed portraits keyed by group.
    pub age_versions: BTreeMap<AgeGroup, ImagePayload>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl BabyRecord {
    /// Build a freshly created record with no age variants.
    pub fn new(
        id: BabyRecordId,
        name: BabyName,
        original_image: ImagePayload,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            original_image,
            age_versions: BTreeMap::new(),
            created_at,
        }
    }

    /// Cached variant for `age_group`, if one has been generated.
    pub fn cached_age(&self, age_group: AgeGroup) -> Option<&ImagePayload> {
        self.age_versions.get(&age_group)
    }

    /// Groups that already have a cached variant, in progression order.
    pub fn cached_groups(&self) -> Vec<AgeGroup> {
        self.age_versions.keys().copied().collect()
    }
}
