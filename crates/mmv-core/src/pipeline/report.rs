//! Run summaries and elapsed-time formatting.

use std::time::Duration;

use crate::api::InitResult;
use crate::verify::VerificationOutcome;

use super::PipelineState;

/// Summary of a completed remote run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub dimension: usize,
    pub init: InitResult,
    pub failed_rows_a: Vec<usize>,
    pub failed_rows_b: Vec<usize>,
    pub digest: String,
    pub verification: VerificationOutcome,
    /// Acquisition start through digest completion.
    pub compute_elapsed: Duration,
    /// Whole run, including session init and verification.
    pub total_elapsed: Duration,
    pub state: PipelineState,
}

impl RunReport {
    pub fn failed_row_count(&self) -> usize {
        self.failed_rows_a.len() + self.failed_rows_b.len()
    }

    /// True only when the session was established, every row was fetched and
    /// the validator accepted the digest.
    pub fn passed(&self) -> bool {
        self.init.success && self.failed_row_count() == 0 && self.verification.accepted
    }
}

/// Summary of a local (offline) run.
#[derive(Debug, Clone)]
pub struct LocalReport {
    pub dimension: usize,
    pub digest: String,
    pub elapsed: Duration,
}

/// `"MM minutes and SS.CC seconds"`.
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02} minutes and {:02}.{:02} seconds",
        secs / 60,
        secs % 60,
        d.subsec_millis() / 10
    )
}
