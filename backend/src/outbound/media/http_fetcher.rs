//! Reqwest-backed media fetcher.
//!
//! One GET per call with a bounded timeout. Redirects are followed only
//! while they stay on trusted hosts; the final status must be a success for
//! the body to be returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, redirect};
use tracing::warn;

use crate::domain::is_trusted_host;
use crate::domain::ports::{MediaFetchError, MediaFetcher};

/// Timeout applied to media downloads unless configured otherwise.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const MAX_REDIRECTS: usize = 5;

/// Media fetcher issuing single-attempt HTTP GET requests.
#[derive(Clone)]
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    /// Build a fetcher whose requests give up after `timeout` and only
    /// follow redirects to `trusted_hosts`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration, trusted_hosts: Vec<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(trusted_redirects(trusted_hosts))
            .build()?;
        Ok(Self { client })
    }
}

fn trusted_redirects(trusted_hosts: Vec<String>) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_trusted_host(attempt.url(), &trusted_hosts) {
            attempt.follow()
        } else {
            warn!(
                host = attempt.url().host_str().unwrap_or_default(),
                "refusing media redirect to untrusted host"
            );
            attempt.error("redirect to untrusted host")
        }
    })
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, MediaFetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaFetchError::status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if body.is_empty() {
            return Err(MediaFetchError::empty_body());
        }
        Ok(body.to_vec())
    }
}

fn map_transport_error(error: reqwest::Error) -> MediaFetchError {
    if error.is_timeout() {
        MediaFetchError::timeout(error.to_string())
    } else {
        MediaFetchError::transport(error.to_string())
    }
}
