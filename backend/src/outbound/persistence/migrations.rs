//! Embedded Diesel migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::define_port_error;

/// Migrations compiled into the binary from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

define_port_error! {
    /// Failures while applying schema migrations.
    pub enum MigrationError {
        /// The database could not be reached.
        Connect { message: String } => "failed to connect for migrations: {message}",
        /// A migration failed to apply.
        Apply { message: String } => "failed to apply migrations: {message}",
        /// The blocking migration task did not complete.
        Task { message: String } => "migration task failed: {message}",
    }
}

/// Apply every pending migration to `database_url`.
///
/// Diesel's migration harness is synchronous, so it runs on the blocking
/// thread pool.
///
/// # Errors
///
/// Returns [`MigrationError`] when connecting or applying a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|err| MigrationError::connect(err.to_string()))?;
        let applied = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::apply(err.to_string()))?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await
    .map_err(|err| MigrationError::task(err.to_string()))?
}
