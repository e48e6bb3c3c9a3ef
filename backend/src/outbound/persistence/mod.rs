//! Record store adapters.
//!
//! - `DieselBabyRecordRepository`: PostgreSQL via Diesel, `diesel-async` and
//!   `bb8` pooling. Rows and schema stay private to this module.
//! - `InMemoryBabyRecordRepository`: process-local map for development and
//!   tests.
//!
//! # Example
//!
//! ```ignore
//! use babygen::outbound::persistence::{DbPool, DieselBabyRecordRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/babygen")).await?;
//! let repository = DieselBabyRecordRepository::new(pool);
//! ```

mod diesel_baby_record_repository;
mod in_memory_baby_record_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_baby_record_repository::DieselBabyRecordRepository;
pub use in_memory_baby_record_repository::InMemoryBabyRecordRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
