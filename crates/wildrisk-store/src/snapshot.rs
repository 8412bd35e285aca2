//! Snapshot and serialization representations for the store.
//!
//! [`StoreSnapshot`] is a defensive copy of all collections used for safe
//! iteration while mutation may be in flight. [`SerializedStore`] is the
//! map-friendly persistence representation: a keyed list of region
//! id/value pairs that reconstructs an equivalent store across process
//! restarts (rankings are recomputed on load).

use serde::{Deserialize, Serialize};
use wildrisk_types::{Constraint, RankingEntry, Region, RegionId, StoreEvent};

/// A structurally independent copy of the store's collections.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Store version at the time of the snapshot.
    pub version: u64,
    /// All region records.
    pub regions: Vec<Region>,
    /// The ranking table.
    pub rankings: Vec<RankingEntry>,
    /// All registered constraints.
    pub constraints: Vec<Constraint>,
    /// The live event log, oldest first.
    pub events: Vec<StoreEvent>,
}

/// Persistence representation of the store.
///
/// Regions are stored as id/value pairs rather than a map so the format
/// is stable under serializers that cannot key maps on structured types.
/// The event log and ranking table are deliberately excluded: the log is
/// operational history and the rankings are derived state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedStore {
    /// Store version counter.
    pub version: u64,
    /// Region records as keyed id/value pairs.
    pub regions: Vec<(RegionId, Region)>,
    /// Registered constraints.
    pub constraints: Vec<Constraint>,
}
