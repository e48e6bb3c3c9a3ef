//! Driven port for retrieving generated media bytes.

use async_trait::async_trait;
use url::Url;

use super::define_port_error;

/// A 1x1 RGBA PNG used as canned media by tests and doubles.
pub const FIXTURE_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0x60, 0xf8, 0x5f,
    0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

define_port_error! {
    /// Errors surfaced while fetching media.
    pub enum MediaFetchError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "media transport failed: {message}",
        /// The fetch exceeded its timeout.
        Timeout { message: String } =>
            "media fetch timed out: {message}",
        /// The server answered with a non-success status.
        Status { status: u16 } =>
            "media fetch returned status {status}",
        /// The server answered successfully with no bytes.
        EmptyBody =>
            "media fetch returned an empty body",
    }
}

/// Port for a single-attempt media download.
///
/// Implementations must not retry: the caller treats any error as a terminal
/// fetch failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the bytes behind `url`.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, MediaFetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_png_decodes() {
        let image = image::load_from_memory(FIXTURE_PNG).expect("fixture decodes");
        assert_eq!((image.width(), image.height()), (1, 1));
    }

    #[test]
    fn status_error_mentions_code() {
        assert_eq!(
            MediaFetchError::status(404_u16).to_string(),
            "media fetch returned status 404"
        );
    }
}
