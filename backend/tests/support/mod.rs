//! Shared wiring for integration tests: the real portrait service over the
//! in-memory store and recording upstream doubles.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;

use babygen::domain::ports::CapabilityResponse;
use babygen::domain::watermark::WatermarkCompositor;
use babygen::domain::{BabyPortraitService, BabyRecordGateway, GenerationOrchestrator};
use babygen::outbound::persistence::InMemoryBabyRecordRepository;
use babygen::test_support::{FixtureClock, RecordingImageGeneration, StaticMediaFetcher};

/// URL the recording capability reports by default.
pub const TRUSTED_URL: &str = "https://storage.googleapis.com/generated/portrait.png";

/// A service plus handles on every collaborator it talks to.
pub struct Pipeline {
    pub service: Arc<BabyPortraitService>,
    pub capability: Arc<RecordingImageGeneration>,
    pub fetcher: Arc<StaticMediaFetcher>,
    pub store: InMemoryBabyRecordRepository,
}

impl Pipeline {
    /// Pipeline whose capability answers every prompt with `response`.
    pub fn answering(response: CapabilityResponse) -> Self {
        let capability = Arc::new(RecordingImageGeneration::returning(response));
        let fetcher = Arc::new(StaticMediaFetcher::default());
        let store = InMemoryBabyRecordRepository::new();
        let orchestrator = GenerationOrchestrator::new(
            capability.clone(),
            fetcher.clone(),
            vec!["storage.googleapis.com".to_owned()],
        );
        let records =
            BabyRecordGateway::new(Arc::new(store.clone()), Arc::new(FixtureClock::default()));
        let service = Arc::new(BabyPortraitService::new(
            orchestrator,
            records,
            WatermarkCompositor::with_bitmap_glyphs(),
        ));
        Self {
            service,
            capability,
            fetcher,
            store,
        }
    }

    /// Pipeline whose capability links to [`TRUSTED_URL`].
    pub fn trusted() -> Self {
        Self::answering(CapabilityResponse::with_content(format!(
            "Here is your portrait: {TRUSTED_URL}"
        )))
    }

    /// Total calls made to either upstream.
    pub fn upstream_calls(&self) -> usize {
        self.capability.calls() + self.fetcher.calls()
    }
}
