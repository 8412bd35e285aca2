//! Per-region data-quality validation.
//!
//! Quality starts at 100 and loses points for missing hazard facts,
//! stale facts, and missing zone records. Regions scoring below the
//! configured threshold are excluded from scoring for that run; the facts
//! stay in the store and are retried next run.

use chrono::{DateTime, Utc};
use wildrisk_types::{DataQuality, Region};

use crate::config::ValidationConfig;

/// Penalty for a region with no fire records at all.
const PENALTY_NO_FIRES: f64 = 25.0;

/// Penalty for a region with no yearly statistics.
const PENALTY_NO_STATISTICS: f64 = 15.0;

/// Penalty for hazard facts older than the staleness threshold.
const PENALTY_STALE_HAZARD: f64 = 20.0;

/// Penalty for a region with no zone records.
const PENALTY_NO_ZONES: f64 = 25.0;

/// Penalty for hazard facts that have never been fetched.
const PENALTY_NEVER_FETCHED: f64 = 30.0;

/// Assess how usable a region's facts are right now.
pub fn assess_region(region: &Region, config: &ValidationConfig, now: DateTime<Utc>) -> DataQuality {
    let mut score = 100.0;
    let mut issues = Vec::new();

    match region.hazard_data.last_updated {
        None => {
            score -= PENALTY_NEVER_FETCHED;
            issues.push(String::from("hazard facts have never been fetched"));
        }
        Some(updated) => {
            let age_hours = now.signed_duration_since(updated).num_hours().max(0);
            let threshold = i64::try_from(config.staleness_hours).unwrap_or(i64::MAX);
            if age_hours > threshold {
                score -= PENALTY_STALE_HAZARD;
                issues.push(format!(
                    "hazard facts are {age_hours}h old (threshold {threshold}h)"
                ));
            }
        }
    }

    if region.hazard_data.fires.is_empty() {
        score -= PENALTY_NO_FIRES;
        issues.push(String::from("no historical fire records"));
    }
    if region.hazard_data.statistics.is_empty() {
        score -= PENALTY_NO_STATISTICS;
        issues.push(String::from("no yearly loss statistics"));
    }
    if region.zoning_data.zones.is_empty() {
        score -= PENALTY_NO_ZONES;
        issues.push(String::from("no zone records"));
    }

    let score = score.max(0.0);
    DataQuality {
        score,
        is_valid: score >= config.min_quality_score,
        issues,
        checked_at: now,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use wildrisk_types::{FireRecord, RegionId, RegionType, YearlyStat, Zone};

    use super::*;

    fn make_region(fires: usize, stats: usize, zones: usize, age_hours: i64) -> Region {
        let mut region = Region::with_defaults(
            RegionId::new("Kelowna"),
            String::from("Kelowna"),
            RegionType::Municipality,
        );
        region.hazard_data.fires = (0..fires)
            .map(|i| FireRecord {
                fire_number: format!("K{i}"),
                year: 2023,
                size_ha: 100.0,
                cause: None,
            })
            .collect();
        region.hazard_data.statistics = (0..stats)
            .map(|i| YearlyStat {
                year: 2020 + i32::try_from(i).unwrap_or(0),
                total_cost: 1_000_000.0,
                structures_destroyed: 1,
                fire_count: 3,
                hectares_burned: 400.0,
            })
            .collect();
        region.hazard_data.last_updated = Some(Utc::now() - Duration::hours(age_hours));
        region.zoning_data.zones = (0..zones)
            .map(|i| Zone {
                zone_id: format!("z{i}"),
                municipality: String::from("Kelowna"),
                category: wildrisk_types::ZoneCategory::Residential,
                status: wildrisk_types::DevelopmentStatus::Developed,
                area_ha: 10.0,
            })
            .collect();
        region
    }

    #[test]
    fn complete_fresh_facts_score_one_hundred() {
        let region = make_region(5, 3, 10, 1);
        let quality = assess_region(&region, &ValidationConfig::default(), Utc::now());
        assert!((quality.score - 100.0).abs() < f64::EPSILON);
        assert!(quality.is_valid);
        assert!(quality.issues.is_empty());
    }

    #[test]
    fn missing_facts_accumulate_penalties() {
        let mut region = make_region(0, 0, 0, 1);
        region.hazard_data.last_updated = None;
        let quality = assess_region(&region, &ValidationConfig::default(), Utc::now());
        // 100 - 30 - 25 - 15 - 25 = 5.
        assert!((quality.score - 5.0).abs() < f64::EPSILON);
        assert!(!quality.is_valid);
        assert_eq!(quality.issues.len(), 4);
    }

    #[test]
    fn stale_hazard_facts_are_penalized() {
        let region = make_region(5, 3, 10, 200);
        let quality = assess_region(&region, &ValidationConfig::default(), Utc::now());
        assert!((quality.score - 80.0).abs() < f64::EPSILON);
        assert!(quality.issues.iter().any(|i| i.contains("old")));
    }

    #[test]
    fn validity_follows_the_configured_threshold() {
        let region = make_region(0, 0, 10, 1);
        // 100 - 25 - 15 = 60.
        let strict = ValidationConfig {
            staleness_hours: 168,
            min_quality_score: 70.0,
        };
        let lenient = ValidationConfig {
            staleness_hours: 168,
            min_quality_score: 50.0,
        };
        assert!(!assess_region(&region, &strict, Utc::now()).is_valid);
        assert!(assess_region(&region, &lenient, Utc::now()).is_valid);
    }

    #[test]
    fn score_floors_at_zero() {
        let mut region = make_region(0, 0, 0, 10_000);
        region.hazard_data.last_updated = None;
        let strict = ValidationConfig {
            staleness_hours: 1,
            min_quality_score: 50.0,
        };
        let quality = assess_region(&region, &strict, Utc::now());
        assert!(quality.score >= 0.0);
    }
}
