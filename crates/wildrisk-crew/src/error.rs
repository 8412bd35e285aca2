//! Error types for the `wildrisk-crew` crate.

use wildrisk_store::StoreError;
use wildrisk_types::{CrewStage, RegionId};

/// Errors that can occur during a crew run.
#[derive(Debug, thiserror::Error)]
pub enum CrewError {
    /// The requested region does not exist in the store.
    #[error("region {0} not found")]
    RegionNotFound(RegionId),

    /// A stage error aborted the run. Earlier store writes remain.
    #[error("stage {stage:?} aborted: {reason}")]
    StageAborted {
        /// The stage that failed.
        stage: CrewStage,
        /// Why it failed.
        reason: String,
    },

    /// The advisory text backend failed.
    #[error("advisor error: {0}")]
    Advisor(String),

    /// A prompt template failed to load or render.
    #[error("template error: {0}")]
    Template(String),

    /// A store write failed mid-run.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}
