//! Driven port for the external image-generation capability.
//!
//! The capability accepts a natural-language prompt, may invoke tools, and
//! answers with free-form text that can contain a media URL. The domain owns
//! this response contract so orchestration stays adapter-agnostic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::define_port_error;

/// Metadata reported alongside a capability response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilityMetadata {
    /// Whether the capability invoked any tools while answering.
    #[serde(default)]
    pub tools_used: bool,
    /// Any further adapter-specific metadata.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response returned by the generation capability.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilityResponse {
    /// Whether the capability considers the call successful.
    pub success: bool,
    /// Free-form text output, possibly containing a media URL.
    #[serde(default)]
    pub content: String,
    /// Capability-reported failure description.
    #[serde(default)]
    pub error: Option<String>,
    /// Call metadata.
    #[serde(default)]
    pub metadata: CapabilityMetadata,
}

impl CapabilityResponse {
    /// Convenience constructor for a successful, tool-assisted answer.
    ///
    /// # Examples
    /// ```
    /// use babygen::domain::ports::CapabilityResponse;
    ///
    /// let response = CapabilityResponse::with_content("done: https://example.test/a.png");
    /// assert!(response.success);
    /// assert!(response.metadata.tools_used);
    /// ```
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            metadata: CapabilityMetadata {
                tools_used: true,
                extra: Map::new(),
            },
        }
    }

    /// Convenience constructor for a capability-reported failure.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
            metadata: CapabilityMetadata::default(),
        }
    }
}

define_port_error! {
    /// Errors surfaced while calling the generation capability.
    pub enum ImageGenerationError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "generation transport failed: {message}",
        /// The call exceeded the adapter timeout.
        Timeout { message: String } =>
            "generation timed out: {message}",
        /// The capability answered with a non-success HTTP status.
        Rejected { status: u16, message: String } =>
            "generation rejected with status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "generation response decode failed: {message}",
    }
}

/// Port for invoking the image-generation capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerationCapability: Send + Sync {
    /// Execute `prompt`, allowing tool invocation when `use_tools` is set.
    async fn execute(
        &self,
        prompt: &str,
        use_tools: bool,
    ) -> Result<CapabilityResponse, ImageGenerationError>;
}
