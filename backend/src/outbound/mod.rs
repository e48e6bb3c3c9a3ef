//! Outbound adapters implementing the driven ports.
//!
//! - **generation**: reqwest client for the image-generation capability
//! - **media**: reqwest single-attempt media fetcher
//! - **persistence**: Diesel/PostgreSQL and in-memory record stores
//!
//! Adapters translate between domain types and wire or storage formats and
//! hold no business rules.

pub mod generation;
pub mod media;
pub mod persistence;
