//! Pass-through observation of extractions. Observers see each input/output pair
//! and can never influence the returned profile.

use tracing::{debug, info};
use uuid::Uuid;

use crate::profile::extractor::ExtractionError;
use crate::profile::models::RunnerProfile;

/// What an observer sees for a single `Extractor::extract` call.
#[derive(Debug)]
pub struct ExtractionReport<'a> {
    pub extraction_id: Uuid,
    pub input: &'a str,
    pub profile: &'a RunnerProfile,
    /// Why the profile fell back to all-absent, if it did.
    pub failure: Option<&'a ExtractionError>,
}

pub trait ExtractionObserver: Send + Sync {
    fn observe(&self, report: &ExtractionReport<'_>);
}

/// Default observer.
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {
    fn observe(&self, _report: &ExtractionReport<'_>) {}
}

/// Emits one structured event per extraction. Enabled with `EXTRACTION_TRACE=true`.
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn observe(&self, report: &ExtractionReport<'_>) {
        let missing: Vec<&str> = report.profile.missing().iter().map(|f| f.as_str()).collect();
        info!(
            extraction_id = %report.extraction_id,
            input_chars = report.input.chars().count(),
            complete = report.profile.is_complete(),
            ?missing,
            failure = ?report.failure.map(|e| e.to_string()),
            "runner profile extraction finished"
        );
        debug!(extraction_id = %report.extraction_id, input = report.input, "extraction input");
    }
}
