//! Identifier types for Wildrisk entities.
//!
//! Internal records (events, reports, conclusions, constraints) use
//! strongly-typed UUID v7 wrappers so identifiers cannot be mixed at
//! compile time. Regions are different: their identity is a human-derived
//! slug ("vancouver", "coastal-fire-centre") that must survive round-trips
//! through external feeds and the dashboard, so [`RegionId`] wraps a
//! normalized string instead of a UUID.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an event in the store's event log.
    EventId
}

define_id! {
    /// Unique identifier for a generated risk report.
    ReportId
}

define_id! {
    /// Unique identifier for an agent conclusion in the ledger.
    ConclusionId
}

define_id! {
    /// Unique identifier for a constraint with a validity window.
    ConstraintId
}

/// Identifier for a tracked region.
///
/// Region identity comes from the outside world (municipality names, fire
/// centre designations), normalized to a lower-case hyphenated slug. The
/// same input always yields the same slug, so feeds that spell a
/// municipality as `"Prince George"` and `"prince_george"` resolve to one
/// region record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Create a region id by normalizing the given name.
    ///
    /// Normalization lower-cases the input, folds every run of
    /// non-alphanumeric characters into a single hyphen, and trims leading
    /// and trailing hyphens.
    pub fn new(raw: &str) -> Self {
        let mut slug = String::with_capacity(raw.len());
        let mut pending_hyphen = false;
        for ch in raw.chars() {
            if ch.is_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.extend(ch.to_lowercase());
            } else {
                pending_hyphen = true;
            }
        }
        Self(slug)
    }

    /// Return the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the slug is empty (the input had no alphanumeric content).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for RegionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
