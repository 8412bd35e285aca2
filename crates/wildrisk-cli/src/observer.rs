//! Store observer that logs every mutation.

use wildrisk_store::StoreObserver;
use wildrisk_types::{EventKind, StoreEvent};

/// Logs store events through `tracing`.
///
/// Routine state churn goes to `debug`; run-level milestones go to
/// `info` so a default filter still shows pipeline completions.
pub struct MutationLogger;

impl StoreObserver for MutationLogger {
    fn on_event(&mut self, event: &StoreEvent) {
        match event.kind {
            EventKind::PipelineCompleted | EventKind::StoreReset => {
                tracing::info!(
                    kind = ?event.kind,
                    region = ?event.region_id,
                    detail = %event.detail,
                    "store event"
                );
            }
            EventKind::StateUpdated | EventKind::RegionCreated | EventKind::RiskScoreUpdated => {
                tracing::debug!(
                    kind = ?event.kind,
                    region = ?event.region_id,
                    detail = %event.detail,
                    "store event"
                );
            }
        }
    }
}
