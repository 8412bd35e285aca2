//! Composite risk score: weighted combination of the three analyses plus
//! a fixed climate placeholder.
//!
//! The engine is a pure function of its inputs and the explicit
//! `current_year`; identical inputs always produce identical scores.

use wildrisk_types::{HazardData, RiskCategory, RiskScore, ZoningData};

use crate::exposure::analyze_exposure;
use crate::loss::analyze_loss;
use crate::vulnerability::analyze_vulnerability;

// ---------------------------------------------------------------------------
// Weights and confidence heuristics
// ---------------------------------------------------------------------------

/// Weight of the exposure component in the overall score.
pub const WEIGHT_EXPOSURE: f64 = 0.35;

/// Weight of the historical-loss component in the overall score.
pub const WEIGHT_HISTORICAL_LOSS: f64 = 0.30;

/// Weight of the vulnerability component in the overall score.
pub const WEIGHT_VULNERABILITY: f64 = 0.25;

/// Weight of the climate component in the overall score.
pub const WEIGHT_CLIMATE: f64 = 0.10;

/// Fixed climate sub-score pending real climate-model integration.
pub const CLIMATE_PLACEHOLDER: f64 = 60.0;

/// Overall score for a region with no facts at all.
///
/// The component floors (exposure 10, loss 15, vulnerability 20) exist
/// so one missing feed never zeroes a score. When every input is empty
/// the weighted combination of floors would read as knowledge the
/// engine does not have, so the overall pins to this fixed floor.
pub const EMPTY_REGION_OVERALL: f64 = 15.0;

/// Confidence baseline for any scored region.
const CONFIDENCE_BASE: f64 = 0.5;

/// Confidence ceiling.
const CONFIDENCE_CAP: f64 = 0.95;

/// Fire-record count above which confidence improves.
const CONFIDENCE_FIRE_RECORDS: usize = 10;

/// Zone count above which confidence improves.
const CONFIDENCE_ZONE_COUNT: usize = 50;

/// Score a region from its hazard and zoning facts.
///
/// Runs the three component analyses, combines them with the fixed
/// weights and the climate placeholder, clamps to [0, 100], and rounds.
/// A region with no fires, no statistics, and no zones scores
/// [`EMPTY_REGION_OVERALL`] instead of the weighted combination.
/// The category band follows deterministically from the overall score.
pub fn score_region(hazard: &HazardData, zoning: &ZoningData, current_year: i32) -> RiskScore {
    let exposure = analyze_exposure(&hazard.fires, current_year);
    let historical_loss = analyze_loss(&hazard.statistics);
    let vulnerability = analyze_vulnerability(zoning);

    let all_empty =
        hazard.fires.is_empty() && hazard.statistics.is_empty() && zoning.zones.is_empty();
    let overall_score = if all_empty {
        EMPTY_REGION_OVERALL
    } else {
        (exposure.score * WEIGHT_EXPOSURE
            + historical_loss.score * WEIGHT_HISTORICAL_LOSS
            + vulnerability.score * WEIGHT_VULNERABILITY
            + CLIMATE_PLACEHOLDER * WEIGHT_CLIMATE)
            .clamp(0.0, 100.0)
            .round()
    };

    let confidence = confidence(hazard, zoning, current_year);

    tracing::debug!(
        overall_score,
        exposure = exposure.score,
        historical_loss = historical_loss.score,
        vulnerability = vulnerability.score,
        confidence,
        "scored region"
    );

    RiskScore {
        overall_score,
        category: RiskCategory::from_score(overall_score),
        exposure,
        historical_loss,
        vulnerability,
        climate_score: CLIMATE_PLACEHOLDER,
        confidence,
    }
}

/// Confidence heuristic for a score.
///
/// Starts at 0.5 and earns fixed bumps for richer inputs: +0.15 for more
/// than ten fire records, +0.15 for any recorded loss cost, +0.10 for
/// more than fifty zones, +0.10 for a fire within the last five years.
/// Capped at 0.95 -- the engine never claims certainty.
fn confidence(hazard: &HazardData, zoning: &ZoningData, current_year: i32) -> f64 {
    let mut value = CONFIDENCE_BASE;

    if hazard.fires.len() > CONFIDENCE_FIRE_RECORDS {
        value += 0.15;
    }
    let total_loss: f64 = hazard.statistics.iter().map(|s| s.total_cost.max(0.0)).sum();
    if total_loss > 0.0 {
        value += 0.15;
    }
    if zoning.zones.len() > CONFIDENCE_ZONE_COUNT {
        value += 0.10;
    }
    let recent_cutoff = current_year.saturating_sub(5);
    if hazard.fires.iter().any(|f| f.year > recent_cutoff) {
        value += 0.10;
    }

    value.min(CONFIDENCE_CAP)
}
