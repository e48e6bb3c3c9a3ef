//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and the `test-support` feature.

use std::io;
use std::net::SocketAddr;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use url::Url;

pub use doubles::{FixtureClock, RecordingImageGeneration, StaticMediaFetcher};

/// Local actix server standing in for an upstream HTTP dependency.
///
/// Must be started from within an actix system, e.g. `#[actix_web::test]`.
pub struct StubServer {
    addr: SocketAddr,
    handle: ServerHandle,
}

impl StubServer {
    /// Bind an ephemeral loopback port and serve `routes` on it.
    ///
    /// # Errors
    ///
    /// Returns an error when the port cannot be bound.
    pub fn start(routes: fn(&mut web::ServiceConfig)) -> io::Result<Self> {
        let server = HttpServer::new(move || App::new().configure(routes))
            .workers(1)
            .disable_signals()
            .shutdown_timeout(1)
            .bind(("127.0.0.1", 0))?;
        let addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| io::Error::other("stub server bound no address"))?;
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Ok(Self { addr, handle })
    }

    /// Absolute URL for `path` on this server.
    #[expect(
        clippy::expect_used,
        reason = "a loopback socket address always forms a valid URL"
    )]
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr)).expect("loopback URL parses")
    }

    /// Stop accepting connections and wait for the workers to exit.
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

pub mod doubles {
    //! Recording implementations of the driven ports.
    //!
    //! Each double counts its calls so tests can assert that validation
    //! failures never reach an upstream.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;
    use tokio::sync::Mutex;
    use url::Url;

    use crate::domain::ports::{
        CapabilityResponse, FIXTURE_PNG, ImageGenerationCapability, ImageGenerationError,
        MediaFetchError, MediaFetcher,
    };

    /// Capability double answering every prompt with one canned response.
    #[derive(Debug, Default)]
    pub struct RecordingImageGeneration {
        response: CapabilityResponse,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingImageGeneration {
        /// Answer every prompt with `response`.
        pub fn returning(response: CapabilityResponse) -> Self {
            Self {
                response,
                ..Self::default()
            }
        }

        /// Answer every prompt with a successful, tool-backed `content`.
        pub fn with_content(content: impl Into<String>) -> Self {
            Self::returning(CapabilityResponse::with_content(content))
        }

        /// Number of `execute` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Prompts received, in order.
        pub async fn prompts(&self) -> Vec<String> {
            self.prompts.lock().await.clone()
        }
    }

    #[async_trait]
    impl ImageGenerationCapability for RecordingImageGeneration {
        async fn execute(
            &self,
            prompt: &str,
            _use_tools: bool,
        ) -> Result<CapabilityResponse, ImageGenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().await.push(prompt.to_owned());
            Ok(self.response.clone())
        }
    }

    /// Fetcher double returning the same bytes for every URL.
    #[derive(Debug)]
    pub struct StaticMediaFetcher {
        bytes: Vec<u8>,
        calls: AtomicUsize,
        urls: Mutex<Vec<Url>>,
    }

    impl Default for StaticMediaFetcher {
        fn default() -> Self {
            Self::returning(FIXTURE_PNG.to_vec())
        }
    }

    impl StaticMediaFetcher {
        /// Serve `bytes` for every URL.
        pub fn returning(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        /// Number of `fetch` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// URLs requested, in order.
        pub async fn urls(&self) -> Vec<Url> {
            self.urls.lock().await.clone()
        }
    }

    #[async_trait]
    impl MediaFetcher for StaticMediaFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, MediaFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().await.push(url.clone());
            if self.bytes.is_empty() {
                return Err(MediaFetchError::empty_body());
            }
            Ok(self.bytes.clone())
        }
    }

    /// Clock frozen at a fixed instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixtureClock(pub DateTime<Utc>);

    impl Default for FixtureClock {
        fn default() -> Self {
            Self(Utc.timestamp_opt(1_767_225_600, 0).single().unwrap_or_default())
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }
}
