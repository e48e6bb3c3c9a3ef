//! Service entry-point: loads settings, applies migrations and serves the
//! portrait API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use babygen::inbound::http::health::HealthState;
use babygen::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{BabygenSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BabygenSettings::load().wrap_err("load settings")?;
    let mut config = ServerConfig::from_settings(&settings).wrap_err("resolve settings")?;

    if let Some(database_url) = settings.database_url() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("apply migrations")?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated")
}
