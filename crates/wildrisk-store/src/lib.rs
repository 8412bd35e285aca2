//! Region-state store for the Wildrisk analysis system.
//!
//! The [`RegionStore`] is the only mutable state in the system: one
//! record per tracked region plus the global event log, constraint list,
//! and derived ranking table. Pipeline runs and crew runs read and write
//! through its methods exclusively.
//!
//! # Modules
//!
//! - [`store`] -- the [`RegionStore`] itself, patches, listings, observers
//! - [`events`] -- bounded event log with a recent ring buffer
//! - [`snapshot`] -- defensive copies and the persistence representation
//! - [`error`] -- [`StoreError`]

pub mod error;
pub mod events;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use events::{EVENT_LOG_CAPACITY, EventLog, RECENT_EVENTS_CAPACITY};
pub use snapshot::{SerializedStore, StoreSnapshot};
pub use store::{
    NoOpObserver, RegionCounts, RegionList, RegionPatch, RegionStore, StoreObserver,
    development_percentages,
};
