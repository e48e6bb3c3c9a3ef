//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so they
//! can be tested with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{BabyPortraitCommand, BabyRecordQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Generation, age progression and watermarking.
    pub portraits: Arc<dyn BabyPortraitCommand>,
    /// Record lookups.
    pub records: Arc<dyn BabyRecordQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(portraits: Arc<dyn BabyPortraitCommand>, records: Arc<dyn BabyRecordQuery>) -> Self {
        Self { portraits, records }
    }
}
