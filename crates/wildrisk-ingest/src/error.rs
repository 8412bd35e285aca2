//! Error types for the `wildrisk-ingest` crate.

/// Errors that can occur while fetching or interpreting feed data.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// An HTTP request failed after exhausting its retries.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A request exceeded its per-attempt deadline on every retry.
    #[error("fetch timed out after {attempts} attempts: {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
        /// How many attempts were made.
        attempts: u32,
    },

    /// A response body could not be interpreted as the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A feed returned data unusable even after dropping bad records.
    #[error("feed validation failed: {0}")]
    Validation(String),
}
