//! Builders wiring adapters into the portrait service and HTTP state.

use std::io;
use std::path::Path;
use std::sync::Arc;

use babygen::domain::ports::BabyRecordRepository;
use babygen::domain::watermark::WatermarkCompositor;
use babygen::domain::{BabyPortraitService, BabyRecordGateway, GenerationOrchestrator};
use babygen::inbound::http::state::HttpState;
use babygen::outbound::generation::HttpImageGeneration;
use babygen::outbound::media::HttpMediaFetcher;
use babygen::outbound::persistence::{DieselBabyRecordRepository, InMemoryBabyRecordRepository};
use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use tracing::{info, warn};

use super::ServerConfig;

/// Read font bytes through a capability-scoped directory handle.
pub(crate) fn read_font(path: &Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "font path has no file name"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    directory.read(Path::new(file_name))
}

/// Build the compositor, falling back to bitmap glyphs when the font is
/// unreadable.
pub(crate) fn build_compositor(font_path: &Path) -> WatermarkCompositor {
    let font_bytes = read_font(font_path)
        .inspect_err(|error| {
            warn!(path = %font_path.display(), %error, "watermark font unreadable");
        })
        .ok();
    WatermarkCompositor::with_fallback(font_bytes)
}

fn build_repository(config: &ServerConfig) -> Arc<dyn BabyRecordRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL record store");
            Arc::new(DieselBabyRecordRepository::new(pool.clone()))
        }
        None => {
            warn!("no database configured; records are kept in memory");
            Arc::new(InMemoryBabyRecordRepository::new())
        }
    }
}

/// Wire the portrait service from configuration.
///
/// # Errors
///
/// Returns an error when an HTTP client cannot be constructed.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let capability = HttpImageGeneration::new(
        config.generation_endpoint.clone(),
        config.generation_timeout,
        config.generation_api_key.clone(),
    )
    .map_err(|err| io::Error::other(format!("build generation client: {err}")))?;
    let fetcher = HttpMediaFetcher::new(config.fetch_timeout, config.trusted_hosts.clone())
        .map_err(|err| io::Error::other(format!("build media client: {err}")))?;

    let orchestrator = GenerationOrchestrator::new(
        Arc::new(capability),
        Arc::new(fetcher),
        config.trusted_hosts.clone(),
    );
    let records = BabyRecordGateway::new(build_repository(config), Arc::new(DefaultClock));
    let service = Arc::new(BabyPortraitService::new(
        orchestrator,
        records,
        build_compositor(&config.font_path),
    ));

    Ok(HttpState::new(service.clone(), service))
}
