//! Reqwest-backed image-generation capability adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and JSON decoding into the domain response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ExecuteRequestDto, ExecuteResponseDto};
use crate::domain::ports::{CapabilityResponse, ImageGenerationCapability, ImageGenerationError};

const USER_AGENT: &str = concat!("babygen/", env!("CARGO_PKG_VERSION"));

/// Capability adapter that POSTs prompts to one endpoint.
pub struct HttpImageGeneration {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpImageGeneration {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        api_key: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl ImageGenerationCapability for HttpImageGeneration {
    async fn execute(
        &self,
        prompt: &str,
        use_tools: bool,
    ) -> Result<CapabilityResponse, ImageGenerationError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&ExecuteRequestDto { prompt, use_tools });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_response(body.as_ref())
    }
}

fn parse_response(body: &[u8]) -> Result<CapabilityResponse, ImageGenerationError> {
    let decoded: ExecuteResponseDto = serde_json::from_slice(body).map_err(|error| {
        ImageGenerationError::decode(format!("invalid capability JSON payload: {error}"))
    })?;
    Ok(decoded.into_domain())
}

fn map_transport_error(error: reqwest::Error) -> ImageGenerationError {
    if error.is_timeout() {
        ImageGenerationError::timeout(error.to_string())
    } else {
        ImageGenerationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageGenerationError {
    let preview = body_preview(body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ImageGenerationError::timeout(format!("status {}", status.as_u16()))
        }
        _ => ImageGenerationError::rejected(status.as_u16(), preview),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
