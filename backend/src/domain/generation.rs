//! Generation orchestrator.
//!
//! Builds prompts, invokes the generation capability with tool use enabled,
//! picks a trusted media URL out of the answer and downloads it. Every
//! collaborator fault is logged here and folded into [`GenerationFailure`];
//! nothing from the ports escapes unconverted.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, warn};

use super::ports::{ImageGenerationCapability, MediaFetchError, MediaFetcher};
use super::{
    AgeGroup, BabyName, Error, ImagePayload, ParseAgeGroupError, extract_trusted_media_url,
    prompts,
};

const GENERIC_CAPABILITY_FAILURE: &str = "image generation failed";

/// Why a generation attempt produced no image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationFailure {
    /// The requested age group is outside the closed set.
    #[error(transparent)]
    InvalidAgeGroup(#[from] ParseAgeGroupError),
    /// The capability failed, reported failure, or did not use its tools.
    #[error("{message}")]
    Capability {
        /// Capability-reported error or a generic fallback.
        message: String,
    },
    /// The answer contained no URL on an allow-listed host.
    #[error("no trusted image URL found in generation response")]
    NoTrustedUrl,
    /// Downloading the generated image failed.
    #[error("failed to download generated image: {0}")]
    Fetch(#[source] MediaFetchError),
}

impl GenerationFailure {
    /// Convert into a domain [`Error`].
    ///
    /// Validation failures keep their own message. Upstream failures use
    /// `summary` as the message and carry the specific reason in `details`.
    pub fn into_error(self, summary: &str) -> Error {
        match self {
            Self::InvalidAgeGroup(err) => Error::invalid_request(err.to_string()),
            other => Error::generation_failed(summary)
                .with_details(json!({ "reason": other.to_string() })),
        }
    }
}

/// Outcome of one generation attempt: a payload or the failure reason.
pub type GenerationResult = Result<ImagePayload, GenerationFailure>;

/// Coordinates the capability call and the media download.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    capability: Arc<dyn ImageGenerationCapability>,
    fetcher: Arc<dyn MediaFetcher>,
    trusted_hosts: Arc<[String]>,
}

impl GenerationOrchestrator {
    /// Create an orchestrator trusting media on `trusted_hosts`.
    pub fn new(
        capability: Arc<dyn ImageGenerationCapability>,
        fetcher: Arc<dyn MediaFetcher>,
        trusted_hosts: Vec<String>,
    ) -> Self {
        Self {
            capability,
            fetcher,
            trusted_hosts: trusted_hosts.into(),
        }
    }

    /// Generate the baseline portrait for `name`.
    pub async fn generate_original(&self, name: &BabyName) -> GenerationResult {
        self.run(prompts::baby_prompt(name)).await
    }

    /// Generate an age-progressed portrait from a raw age group label.
    ///
    /// Unknown labels fail before any collaborator is called.
    pub async fn generate_aged(
        &self,
        name: &BabyName,
        age_group: &str,
        reference_description: Option<&str>,
    ) -> GenerationResult {
        let age_group = age_group.parse::<AgeGroup>().inspect_err(|err| {
            warn!(error = %err, "rejected age group before generation");
        })?;
        self.generate_aged_for(name, age_group, reference_description)
            .await
    }

    /// Generate an age-progressed portrait for an already validated group.
    pub async fn generate_aged_for(
        &self,
        name: &BabyName,
        age_group: AgeGroup,
        reference_description: Option<&str>,
    ) -> GenerationResult {
        self.run(prompts::aged_prompt(name, age_group, reference_description))
            .await
    }

    async fn run(&self, prompt: String) -> GenerationResult {
        let response = self.capability.execute(&prompt, true).await.map_err(|err| {
            error!(error = %err, "generation capability call failed");
            GenerationFailure::Capability {
                message: err.to_string(),
            }
        })?;

        if !response.success || !response.metadata.tools_used {
            let message = response
                .error
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| GENERIC_CAPABILITY_FAILURE.to_owned());
            error!(
                success = response.success,
                tools_used = response.metadata.tools_used,
                error = %message,
                "generation capability reported failure"
            );
            return Err(GenerationFailure::Capability { message });
        }

        let url = extract_trusted_media_url(&response.content, &self.trusted_hosts)
            .ok_or_else(|| {
                error!("generation response contained no trusted media URL");
                GenerationFailure::NoTrustedUrl
            })?;
        debug!(host = url.host_str().unwrap_or_default(), "fetching generated media");

        let bytes = self.fetcher.fetch(&url).await.map_err(|err| {
            error!(error = %err, "generated media fetch failed");
            GenerationFailure::Fetch(err)
        })?;
        if bytes.is_empty() {
            error!("generated media fetch returned no bytes");
            return Err(GenerationFailure::Fetch(MediaFetchError::empty_body()));
        }
        Ok(ImagePayload::encode(&bytes))
    }
}
