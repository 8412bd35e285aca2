//! Bounded event log with a recent-events ring buffer.
//!
//! Every store mutation emits a [`StoreEvent`]. The live log is
//! append-only but bounded: once it reaches capacity the oldest entries
//! are dropped. A smaller ring buffer keeps the most recent events for
//! cheap dashboard queries.

use std::collections::VecDeque;

use chrono::Utc;
use wildrisk_types::{EventId, EventKind, EventStatus, RegionId, StoreEvent};

/// Maximum number of entries retained in the live event log.
pub const EVENT_LOG_CAPACITY: usize = 1_000;

/// Maximum number of entries retained in the recent ring buffer.
pub const RECENT_EVENTS_CAPACITY: usize = 100;

/// The store's event log: a bounded live log plus a recent ring buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    log: VecDeque<StoreEvent>,
    recent: VecDeque<StoreEvent>,
}

impl EventLog {
    /// Create an empty event log.
    pub const fn new() -> Self {
        Self {
            log: VecDeque::new(),
            recent: VecDeque::new(),
        }
    }

    /// Build and record an event.
    ///
    /// Assigns the id and timestamp, stamps the initial
    /// [`EventStatus::Pending`] status, and appends to both the live log
    /// and the recent ring buffer, dropping the oldest entries past each
    /// capacity.
    pub fn emit(
        &mut self,
        kind: EventKind,
        region_id: Option<RegionId>,
        detail: String,
    ) -> StoreEvent {
        let event = StoreEvent {
            id: EventId::new(),
            kind,
            region_id,
            detail,
            status: EventStatus::Pending,
            timestamp: Utc::now(),
        };

        self.log.push_back(event.clone());
        while self.log.len() > EVENT_LOG_CAPACITY {
            self.log.pop_front();
        }

        self.recent.push_back(event.clone());
        while self.recent.len() > RECENT_EVENTS_CAPACITY {
            self.recent.pop_front();
        }

        event
    }

    /// Number of entries in the live log.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// True if no events have been recorded (or all were dropped).
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Iterate over the live log, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &StoreEvent> {
        self.log.iter()
    }

    /// The most recent events, oldest first, up to the ring capacity.
    pub fn recent(&self) -> impl Iterator<Item = &StoreEvent> {
        self.recent.iter()
    }

    /// Trim the live log down to the given size, dropping oldest entries.
    ///
    /// Used by the pipeline's cleanup stage to shrink the log between
    /// runs. A `keep` at or above the current length is a no-op.
    pub fn trim_to(&mut self, keep: usize) -> usize {
        let mut dropped = 0usize;
        while self.log.len() > keep {
            self.log.pop_front();
            dropped = dropped.saturating_add(1);
        }
        dropped
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.log.clear();
        self.recent.clear();
    }
}
