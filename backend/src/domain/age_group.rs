//! Closed set of life stages a portrait can be progressed to.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Life-stage label selecting an age-appropriate prompt descriptor.
///
/// Parsing is strict: anything outside `baby`, `child`, `teen` and `adult`
/// is rejected before any generation work starts.
///
/// # Examples
/// ```
/// use babygen::domain::AgeGroup;
///
/// let group: AgeGroup = "teen".parse().expect("known group");
/// assert_eq!(group, AgeGroup::Teen);
/// assert_eq!(group.descriptor(), "a teenage person (14-16 years old)");
/// assert!("toddler".parse::<AgeGroup>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Infant, 0-2 years.
    Baby,
    /// Young child, 5-8 years.
    Child,
    /// Teenager, 14-16 years.
    Teen,
    /// Young adult, 20-25 years.
    Adult,
}

impl AgeGroup {
    /// Every group in progression order.
    pub const ALL: [Self; 4] = [Self::Baby, Self::Child, Self::Teen, Self::Adult];

    /// Storage key used in the record's `age_versions` map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baby => "baby",
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Adult => "adult",
        }
    }

    /// Natural-language age description embedded in generation prompts.
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Baby => "a cute baby (0-2 years old)",
            Self::Child => "a young child (5-8 years old)",
            Self::Teen => "a teenage person (14-16 years old)",
            Self::Adult => "a young adult (20-25 years old)",
        }
    }

    /// Capitalised label suitable for watermarks.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baby => "Baby",
            Self::Child => "Child",
            Self::Teen => "Teen",
            Self::Adult => "Adult",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown age group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid age group: {input}")]
pub struct ParseAgeGroupError {
    /// The unrecognised input value.
    pub input: String,
}

impl std::str::FromStr for AgeGroup {
    type Err = ParseAgeGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baby" => Ok(Self::Baby),
            "child" => Ok(Self::Child),
            "teen" => Ok(Self::Teen),
            "adult" => Ok(Self::Adult),
            _ => Err(ParseAgeGroupError {
                input: s.to_owned(),
            }),
        }
    }
}
