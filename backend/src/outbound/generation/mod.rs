//! Image-generation capability adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `ImageGenerationCapability` port.

mod dto;
mod http_capability;

pub use http_capability::HttpImageGeneration;
