//! Error types for the Wildrisk binary.

use wildrisk_crew::CrewError;
use wildrisk_pipeline::{ConfigError, PipelineError};

/// Top-level errors surfaced by the binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The advisor section of the config file could not be parsed.
    #[error("advisor config error: {0}")]
    AdvisorConfig(String),

    /// The pipeline runner could not be constructed.
    #[error("pipeline error: {source}")]
    Pipeline {
        /// The underlying pipeline error.
        #[from]
        source: PipelineError,
    },

    /// A crew run failed.
    #[error("crew error: {source}")]
    Crew {
        /// The underlying crew error.
        #[from]
        source: CrewError,
    },
}
