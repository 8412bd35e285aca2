//! Vulnerability analysis from zoning facts.
//!
//! Vulnerability measures what a fire would hit: how built out the
//! region is, the estimated replacement value of zoned land, and how much
//! of that land is residential. Per-category replacement values and
//! population densities are fixed lookup constants.

use wildrisk_types::{VulnerabilityAnalysis, Zone, ZoneCategory, ZoningData};

// ---------------------------------------------------------------------------
// Component caps and ramps
// ---------------------------------------------------------------------------

/// Maximum contribution of the developed percentage.
const DEVELOPED_CAP: f64 = 40.0;

/// Points per developed percentage point.
const DEVELOPED_RAMP: f64 = 0.4;

/// Maximum contribution of estimated exposure value.
const VALUE_CAP: f64 = 40.0;

/// Estimated value at which the value component saturates, in dollars.
const VALUE_SATURATION: f64 = 10_000_000_000.0;

/// Maximum contribution of residential concentration.
const RESIDENTIAL_CAP: f64 = 20.0;

/// Multiplier applied to the residential area fraction.
const RESIDENTIAL_RAMP: f64 = 40.0;

/// Vulnerability score for a region with no zone records at all.
///
/// A deliberate design floor: unzoned does not mean nothing to protect.
pub const EMPTY_VULNERABILITY_FLOOR: f64 = 20.0;

/// Estimated replacement value per hectare by land-use category, in
/// dollars. Fixed constants calibrated against BC assessment averages.
pub const fn value_per_ha(category: ZoneCategory) -> f64 {
    match category {
        ZoneCategory::Residential => 2_500_000.0,
        ZoneCategory::Commercial => 4_000_000.0,
        ZoneCategory::Industrial => 3_000_000.0,
        ZoneCategory::MixedUse => 3_500_000.0,
        ZoneCategory::Agricultural => 50_000.0,
        ZoneCategory::Rural => 100_000.0,
        ZoneCategory::Parkland => 10_000.0,
    }
}

/// Estimated resident population per hectare by land-use category.
pub const fn density_per_ha(category: ZoneCategory) -> f64 {
    match category {
        ZoneCategory::Residential => 25.0,
        ZoneCategory::MixedUse => 30.0,
        ZoneCategory::Commercial => 10.0,
        ZoneCategory::Industrial => 5.0,
        ZoneCategory::Agricultural => 0.5,
        ZoneCategory::Rural => 0.3,
        ZoneCategory::Parkland => 0.2,
    }
}

/// Analyze a region's vulnerability from its zoning facts.
///
/// Uses the zoning data's derived developed percentage (recomputed by
/// the store on every zoning write) and the fixed per-category tables.
pub fn analyze_vulnerability(zoning: &ZoningData) -> VulnerabilityAnalysis {
    if zoning.zones.is_empty() {
        return VulnerabilityAnalysis {
            score: EMPTY_VULNERABILITY_FLOOR,
            developed_score: 0.0,
            exposure_value_score: 0.0,
            residential_score: 0.0,
            estimated_value: 0.0,
            developed_percentage: 0.0,
            population_estimate: 0.0,
        };
    }

    let estimated_value = estimated_exposure_value(&zoning.zones);
    let population_estimate: f64 = zoning
        .zones
        .iter()
        .map(|z| z.area_ha.max(0.0) * density_per_ha(z.category))
        .sum();

    let total_area: f64 = zoning.zones.iter().map(|z| z.area_ha.max(0.0)).sum();
    let residential_area: f64 = zoning
        .zones
        .iter()
        .filter(|z| z.category == ZoneCategory::Residential)
        .map(|z| z.area_ha.max(0.0))
        .sum();
    let residential_fraction = if total_area > 0.0 {
        residential_area / total_area
    } else {
        0.0
    };

    let developed_percentage = zoning.developed_percentage.clamp(0.0, 100.0);
    let developed_score = (developed_percentage * DEVELOPED_RAMP).min(DEVELOPED_CAP);
    let exposure_value_score =
        (estimated_value / VALUE_SATURATION * VALUE_CAP).min(VALUE_CAP);
    let residential_score = (residential_fraction * RESIDENTIAL_RAMP).min(RESIDENTIAL_CAP);

    let score = (developed_score + exposure_value_score + residential_score).round();

    VulnerabilityAnalysis {
        score,
        developed_score,
        exposure_value_score,
        residential_score,
        estimated_value,
        developed_percentage,
        population_estimate,
    }
}

/// Total estimated replacement value of a zone list, in dollars.
pub fn estimated_exposure_value(zones: &[Zone]) -> f64 {
    zones
        .iter()
        .map(|z| z.area_ha.max(0.0) * value_per_ha(z.category))
        .sum()
}
