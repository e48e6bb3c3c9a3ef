//! Media download adapters.
//!
//! This module provides a thin HTTP implementation of the `MediaFetcher`
//! port.

mod http_fetcher;

pub use http_fetcher::{DEFAULT_FETCH_TIMEOUT, HttpMediaFetcher};
