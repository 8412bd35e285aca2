//! Error types for the `wildrisk-pipeline` crate.
//!
//! Stage failures never surface here; they are absorbed into stage
//! results. These errors cover runner construction and configuration.

use crate::config::ConfigError;
use wildrisk_ingest::IngestError;

/// Errors that can occur building or configuring the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// A feed collaborator could not be constructed.
    #[error("ingest error: {source}")]
    Ingest {
        /// The underlying ingestion error.
        #[from]
        source: IngestError,
    },
}
