//! Report builder: cost projections, recovery ladder, explainability.
//!
//! Derives everything from an existing [`RiskScore`]; performs no I/O and
//! has no failure modes beyond a caller asking for a report on an
//! unscored region.

use wildrisk_types::{
    CostScenario, Explainability, Region, RegionId, ReportId, RecoveryRung, RiskReport, RiskScore,
};

use crate::error::ScoringError;
use crate::score::{
    WEIGHT_CLIMATE, WEIGHT_EXPOSURE, WEIGHT_HISTORICAL_LOSS, WEIGHT_VULNERABILITY,
};

// ---------------------------------------------------------------------------
// Scenario and ladder constants
// ---------------------------------------------------------------------------

/// The four projection scenarios: name and cost multiplier.
const SCENARIOS: [(&str, f64); 4] = [
    ("baseline", 1.0),
    ("moderate_climate", 1.35),
    ("severe_climate", 1.9),
    ("development_growth", 1.5),
];

/// Lower confidence-interval bound as a multiple of the projection.
const CI_LOW: f64 = 0.75;

/// Upper confidence-interval bound as a multiple of the projection.
const CI_HIGH: f64 = 1.40;

/// The recovery ladder: severity, damage fraction of exposure value,
/// recovery months, insurance-payout fraction of damage.
const LADDER: [(&str, f64, u32, f64); 4] = [
    ("minor", 0.005, 3, 0.80),
    ("moderate", 0.03, 9, 0.75),
    ("major", 0.12, 24, 0.70),
    ("catastrophic", 0.35, 60, 0.60),
];

/// Annualized cost factor applied to exposure value when a region has no
/// loss history to project from.
const SYNTHETIC_BASELINE_FACTOR: f64 = 0.000_5;

/// Fixed data sources cited by every report.
const DATA_SOURCES: [&str; 3] = [
    "BC Wildfire Service historical fire perimeters",
    "BC Wildfire Service yearly statistics",
    "BC Data Catalogue municipal zoning records",
];

/// Fixed limitations cited by every report.
const LIMITATIONS: [&str; 4] = [
    "climate sub-score is a fixed placeholder pending climate-model integration",
    "replacement values use fixed per-category averages, not parcel assessments",
    "loss statistics cover suppression and structure costs only",
    "projections assume the region's zoning mix stays constant",
];

/// Build a risk report from a region's score.
pub fn build_report(region_id: RegionId, score: &RiskScore) -> RiskReport {
    let baseline = baseline_annual_cost(score);
    let cost_projections = SCENARIOS
        .iter()
        .map(|&(name, multiplier)| {
            let projected = baseline * multiplier;
            CostScenario {
                name: name.to_owned(),
                multiplier,
                projected_annual_cost: projected,
                low_estimate: projected * CI_LOW,
                high_estimate: projected * CI_HIGH,
            }
        })
        .collect();

    let severity_scale = 1.0 + score.overall_score / 200.0;
    let exposure_value = score.vulnerability.estimated_value;
    let recovery_ladder = LADDER
        .iter()
        .map(|&(severity, damage_fraction, months, payout_fraction)| {
            let estimated_damage = exposure_value * damage_fraction * severity_scale;
            let insurance_payout = estimated_damage * payout_fraction;
            RecoveryRung {
                severity: severity.to_owned(),
                estimated_damage,
                recovery_months: months,
                insurance_payout,
                out_of_pocket: estimated_damage - insurance_payout,
            }
        })
        .collect();

    RiskReport {
        id: ReportId::new(),
        region_id,
        overall_score: score.overall_score,
        cost_projections,
        recovery_ladder,
        explainability: explainability(),
        generated_at: chrono::Utc::now(),
    }
}

/// Build a report for a region, failing if it has never been scored.
pub fn report_for_region(region: &Region) -> Result<RiskReport, ScoringError> {
    let score = region
        .risk_score
        .as_ref()
        .ok_or_else(|| ScoringError::MissingRiskScore(region.region_id.clone()))?;
    Ok(build_report(region.region_id.clone(), score))
}

/// The projected annual cost all scenarios multiply.
///
/// Uses the observed average annual loss when history exists; otherwise
/// synthesizes one from the estimated exposure value scaled by the score,
/// so scenario tables are never degenerate zeros.
fn baseline_annual_cost(score: &RiskScore) -> f64 {
    let observed = score.historical_loss.avg_annual_cost;
    if observed > 0.0 {
        return observed;
    }
    score.vulnerability.estimated_value * SYNTHETIC_BASELINE_FACTOR
        * (score.overall_score / 100.0)
}

/// The explainability payload: methodology, sources, weights, limitations.
fn explainability() -> Explainability {
    let mut feature_importance = std::collections::BTreeMap::new();
    feature_importance.insert(String::from("exposure"), WEIGHT_EXPOSURE);
    feature_importance.insert(String::from("historical_loss"), WEIGHT_HISTORICAL_LOSS);
    feature_importance.insert(String::from("vulnerability"), WEIGHT_VULNERABILITY);
    feature_importance.insert(String::from("climate"), WEIGHT_CLIMATE);

    Explainability {
        methodology: String::from(
            "Weighted composite of exposure (historical fire activity), historical loss \
             (yearly cost and structure statistics), vulnerability (zoning mix and estimated \
             replacement value), and a fixed climate placeholder. Each component is a capped \
             linear ramp; the overall score is the weighted sum clamped to 0-100.",
        ),
        data_sources: DATA_SOURCES.iter().map(|&s| s.to_owned()).collect(),
        feature_importance,
        limitations: LIMITATIONS.iter().map(|&s| s.to_owned()).collect(),
    }
}
