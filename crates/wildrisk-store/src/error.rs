//! Error types for the `wildrisk-store` crate.
//!
//! All fallible operations in this crate return [`StoreError`] through the
//! standard [`Result`] type alias.

use wildrisk_types::RegionId;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested region does not exist in the store.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A region id normalized to an empty slug.
    #[error("region id is empty after normalization: {raw:?}")]
    EmptyRegionId {
        /// The raw input that produced the empty slug.
        raw: String,
    },
}
