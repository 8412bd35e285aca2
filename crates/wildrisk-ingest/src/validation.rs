//! Fetch-level validation bookkeeping.
//!
//! Feeds are messy: features arrive with missing properties, wrong types,
//! or unrecognized category strings. Bad records are dropped and counted
//! here as warnings; a fetch only hard-fails when nothing usable remains
//! and the transport itself succeeded.

/// What a fetch kept, dropped, and complained about.
#[derive(Debug, Clone, Default)]
pub struct IngestValidation {
    /// Records that parsed cleanly and were kept.
    pub records_kept: usize,
    /// Records dropped as garbled or incomplete.
    pub records_dropped: usize,
    /// Human-readable warnings, one per problem.
    pub warnings: Vec<String>,
}

impl IngestValidation {
    /// Record a kept record.
    pub const fn keep(&mut self) {
        self.records_kept = self.records_kept.saturating_add(1);
    }

    /// Record a dropped record with the reason.
    pub fn drop_record(&mut self, reason: String) {
        self.records_dropped = self.records_dropped.saturating_add(1);
        self.warnings.push(reason);
    }

    /// Whether the fetch was entirely clean.
    pub fn is_clean(&self) -> bool {
        self.records_dropped == 0 && self.warnings.is_empty()
    }
}
