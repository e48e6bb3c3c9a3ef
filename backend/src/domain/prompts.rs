//! Prompt templates sent to the generation capability.

use super::{AgeGroup, BabyName};

/// Prompt for the baseline portrait.
///
/// The wording primes the capability for later age progression by asking for
/// a clear, well-lit face.
pub fn baby_prompt(name: &BabyName) -> String {
    format!(
        "Generate a photorealistic image of a cute baby named {name}. \
         The baby should have clear facial features, bright eyes, and a peaceful expression. \
         High quality, professional photography style, soft natural lighting, \
         close-up portrait showing the baby's face clearly. \
         The image should be suitable for age progression with consistent facial attributes."
    )
}

/// Prompt for an age-progressed portrait.
///
/// A non-blank `reference_description` is repeated verbatim in a consistency
/// clause.
pub fn aged_prompt(
    name: &BabyName,
    age_group: AgeGroup,
    reference_description: Option<&str>,
) -> String {
    let consistency = reference_description
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .map(|reference| {
            format!(" Maintain consistent facial features from this description: {reference}.")
        })
        .unwrap_or_default();
    format!(
        "Generate a photorealistic portrait of {descriptor} named {name}. \
         High quality professional photography, clear facial features, natural lighting, \
         close-up portrait showing the face clearly.{consistency} \
         The person should look natural and realistic for their age.",
        descriptor = age_group.descriptor(),
    )
}
