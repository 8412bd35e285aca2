//! Feed collaborators for the Wildrisk analysis system.
//!
//! Hazard (fire perimeters, yearly statistics) and zoning facts come from
//! external government feeds. Each collaborator is an enum over a
//! WFS-style HTTP client and an in-memory fixture source, so the pipeline
//! and tests run identically online and offline. Fetches are bounded: a
//! hard feature cap, per-attempt deadlines, and retry with exponential
//! backoff. Bad records are dropped with warnings, never silently.

pub mod client;
pub mod error;
pub mod hazard;
pub mod paginate;
pub mod validation;
pub mod zoning;

pub use client::{FeatureFetch, WfsClient};
pub use error::IngestError;
pub use hazard::{FixtureHazardSource, HazardFetch, HazardSource, HttpHazardSource};
pub use paginate::FEATURE_CAP;
pub use validation::IngestValidation;
pub use zoning::{
    DevelopmentIndicators, FixtureZoningSource, HttpZoningSource, ZoningFetch, ZoningSource,
    calculate_development_indicators,
};
