//! The Wildrisk analysis pipeline.
//!
//! An 8-stage run refreshes every tracked region's facts, validates
//! their quality, scores the usable ones, appends reports, and cleans up
//! store bookkeeping. Stage failures are isolated: each stage produces a
//! [`StageResult`] whether it succeeded or not, and only a failed
//! ingestion stage changes later behavior (scoring is skipped).
//!
//! [`StageResult`]: stages::StageResult

pub mod config;
pub mod error;
pub mod runner;
pub mod stages;
pub mod validation;

pub use config::{AnalysisConfig, ConfigError, IngestConfig, IngestMode, TrackedRegion};
pub use error::PipelineError;
pub use runner::PipelineRunner;
pub use stages::{PipelineRun, RunSummary, StageResult};
pub use validation::assess_region;
