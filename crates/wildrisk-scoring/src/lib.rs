//! Pure, deterministic wildfire risk scoring for Wildrisk.
//!
//! Three component analyses (exposure, historical loss, vulnerability)
//! feed a weighted composite score, and the report builder turns scores
//! into cost projections, a recovery ladder, and an explainability
//! payload. Nothing here performs I/O or reads the wall clock except
//! report timestamping; scoring itself takes an explicit `current_year`
//! so historical runs reproduce exactly.

pub mod error;
pub mod exposure;
pub mod loss;
pub mod report;
pub mod score;
pub mod vulnerability;

pub use error::ScoringError;
pub use exposure::analyze_exposure;
pub use loss::analyze_loss;
pub use report::{build_report, report_for_region};
pub use score::score_region;
pub use vulnerability::{analyze_vulnerability, estimated_exposure_value};
