//! Error types for the `wildrisk-scoring` crate.
//!
//! The engine itself is total over its inputs; the only failure mode is a
//! caller asking for a report on a region that has never been scored.

use wildrisk_types::RegionId;

/// Errors that can occur when building derived artifacts from scores.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// A report was requested for a region with no risk score.
    #[error("region {0} has no risk score; run scoring first")]
    MissingRiskScore(RegionId),
}
