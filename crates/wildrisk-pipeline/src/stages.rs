//! Stage result and run summary types.
//!
//! Every stage produces a [`StageResult`] whether it succeeded or not;
//! a failing stage never aborts the run, it only marks the run
//! unsuccessful. The one cross-stage dependency is scoring, which is
//! skipped when ingestion produced nothing usable.

use wildrisk_types::PipelineStage;

/// The outcome of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    /// Which stage this records.
    pub stage: PipelineStage,
    /// Whether the stage completed its work.
    pub success: bool,
    /// Wall-clock duration of the stage in milliseconds.
    pub duration_ms: u64,
    /// How many records the stage touched.
    pub records_processed: usize,
    /// Errors the stage absorbed.
    pub errors: Vec<String>,
    /// Non-fatal problems the stage noted.
    pub warnings: Vec<String>,
}

/// Aggregate summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Stages that completed successfully.
    pub stages_completed: usize,
    /// Total stages executed.
    pub stages_total: usize,
    /// Sum of records touched across all stages.
    pub total_records: usize,
    /// Total errors absorbed across all stages.
    pub error_count: usize,
    /// Total warnings noted across all stages.
    pub warning_count: usize,
    /// Regions that received a fresh risk score this run.
    pub regions_analyzed: usize,
    /// Names of the top-ranked regions after the run.
    pub top_regions: Vec<String>,
}

/// The full result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// True only when every stage succeeded.
    pub success: bool,
    /// Per-stage results in execution order.
    pub stage_results: Vec<StageResult>,
    /// Aggregate counters and the top ranking names.
    pub summary: RunSummary,
}

/// Whether either ingestion stage failed in the results so far.
/// Scoring is skipped in that case.
pub fn ingestion_failed(results: &[StageResult]) -> bool {
    results.iter().any(|r| {
        !r.success
            && matches!(
                r.stage,
                PipelineStage::WildfireIngestion | PipelineStage::ZoningIngestion
            )
    })
}
