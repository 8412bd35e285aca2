//! Exposure analysis from historical fire perimeters.
//!
//! Exposure measures how much wildfire activity a region has actually
//! seen: total burned area, recent frequency, and the count of major
//! events. Each component is a capped linear ramp; the combined score is
//! their rounded sum. All math is deterministic for identical inputs --
//! the recency window is anchored to the `current_year` argument, never
//! the wall clock.

use wildrisk_types::{ExposureAnalysis, FireRecord, FireTrend};

// ---------------------------------------------------------------------------
// Component caps and ramps
// ---------------------------------------------------------------------------

/// Maximum contribution of burned area.
const AREA_CAP: f64 = 40.0;

/// Hectares at which the area component saturates.
const AREA_SATURATION_HA: f64 = 50_000.0;

/// Maximum contribution of recent fire frequency.
const FREQUENCY_CAP: f64 = 30.0;

/// Recent fire count at which the frequency component saturates.
const FREQUENCY_SATURATION: f64 = 10.0;

/// Maximum contribution of major events.
const MAJOR_EVENT_CAP: f64 = 30.0;

/// Major-fire count at which the major-event component saturates.
const MAJOR_EVENT_SATURATION: f64 = 5.0;

/// Perimeter size that qualifies a fire as a major event, in hectares.
const MAJOR_FIRE_THRESHOLD_HA: f64 = 1_000.0;

/// Recency window length in years.
const RECENT_WINDOW_YEARS: i32 = 5;

/// Recent:prior fire-count ratio above which the trend is increasing.
const TREND_INCREASING_RATIO: f64 = 1.3;

/// Recent:prior fire-count ratio below which the trend is decreasing.
const TREND_DECREASING_RATIO: f64 = 0.7;

/// Exposure score for a region with no fire history at all.
///
/// A deliberate design floor, not a bug: absence of records is not
/// evidence of absence of risk, so empty input scores 10 rather than 0.
pub const EMPTY_EXPOSURE_FLOOR: f64 = 10.0;

/// Analyze a region's wildfire exposure from its fire records.
///
/// `current_year` anchors the five-year recency window; pass the same
/// value to reproduce a historical run exactly.
pub fn analyze_exposure(fires: &[FireRecord], current_year: i32) -> ExposureAnalysis {
    if fires.is_empty() {
        return ExposureAnalysis {
            score: EMPTY_EXPOSURE_FLOOR,
            area_score: 0.0,
            frequency_score: 0.0,
            major_event_score: 0.0,
            total_burned_ha: 0.0,
            fires_last_5y: 0,
            major_fires: 0,
            trend: FireTrend::Stable,
        };
    }

    let total_burned_ha: f64 = fires.iter().map(|f| f.size_ha.max(0.0)).sum();
    let recent_cutoff = current_year.saturating_sub(RECENT_WINDOW_YEARS);
    let prior_cutoff = current_year.saturating_sub(RECENT_WINDOW_YEARS.saturating_mul(2));

    let fires_last_5y = count_u32(fires.iter().filter(|f| f.year > recent_cutoff));
    let prior_window = count_u32(
        fires
            .iter()
            .filter(|f| f.year > prior_cutoff && f.year <= recent_cutoff),
    );
    let major_fires = count_u32(fires.iter().filter(|f| f.size_ha > MAJOR_FIRE_THRESHOLD_HA));

    let area_score = (total_burned_ha / AREA_SATURATION_HA * AREA_CAP).min(AREA_CAP);
    let frequency_score =
        (f64::from(fires_last_5y) / FREQUENCY_SATURATION * FREQUENCY_CAP).min(FREQUENCY_CAP);
    let major_event_score = (f64::from(major_fires) / MAJOR_EVENT_SATURATION * MAJOR_EVENT_CAP)
        .min(MAJOR_EVENT_CAP);

    let score = (area_score + frequency_score + major_event_score).round();

    ExposureAnalysis {
        score,
        area_score,
        frequency_score,
        major_event_score,
        total_burned_ha,
        fires_last_5y,
        major_fires,
        trend: trend(fires_last_5y, prior_window),
    }
}

/// Classify the fire-activity trend from recent vs. prior window counts.
///
/// An empty prior window with recent activity counts as increasing; with
/// no activity in either window the trend is stable.
fn trend(recent: u32, prior: u32) -> FireTrend {
    if prior == 0 {
        return if recent == 0 {
            FireTrend::Stable
        } else {
            FireTrend::Increasing
        };
    }
    let ratio = f64::from(recent) / f64::from(prior);
    if ratio > TREND_INCREASING_RATIO {
        FireTrend::Increasing
    } else if ratio < TREND_DECREASING_RATIO {
        FireTrend::Decreasing
    } else {
        FireTrend::Stable
    }
}

/// Count an iterator into a `u32`, saturating on overflow.
fn count_u32<I: Iterator>(iter: I) -> u32 {
    u32::try_from(iter.count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const YEAR: i32 = 2026;

    fn fire(year: i32, size_ha: f64) -> FireRecord {
        FireRecord {
            fire_number: format!("K{year}"),
            year,
            size_ha,
            cause: None,
        }
    }

    #[test]
    fn empty_input_scores_the_floor() {
        let analysis = analyze_exposure(&[], YEAR);
        assert!((analysis.score - EMPTY_EXPOSURE_FLOOR).abs() < f64::EPSILON);
        assert_eq!(analysis.trend, FireTrend::Stable);
    }

    #[test]
    fn area_component_caps_at_forty() {
        // 200,000 ha burned is far past the 50,000 ha saturation point.
        let fires = vec![fire(2000, 200_000.0)];
        let analysis = analyze_exposure(&fires, YEAR);
        assert!((analysis.area_score - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn frequency_counts_only_recent_window() {
        let fires = vec![
            fire(2025, 10.0),
            fire(2024, 10.0),
            fire(2015, 10.0), // outside the 5-year window
        ];
        let analysis = analyze_exposure(&fires, YEAR);
        assert_eq!(analysis.fires_last_5y, 2);
    }

    #[test]
    fn major_event_component_caps_at_thirty() {
        let fires: Vec<FireRecord> = (0..8).map(|i| fire(2010 + i, 5_000.0)).collect();
        let analysis = analyze_exposure(&fires, YEAR);
        assert_eq!(analysis.major_fires, 8);
        assert!((analysis.major_event_score - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_never_exceeds_one_hundred() {
        let fires: Vec<FireRecord> = (0..40).map(|i| fire(2022 + (i % 4), 10_000.0)).collect();
        let analysis = analyze_exposure(&fires, YEAR);
        assert!(analysis.score <= 100.0);
        assert!(analysis.score >= 0.0);
    }

    #[test]
    fn trend_increasing_when_recent_outpaces_prior() {
        // 3 recent fires vs 1 prior: ratio 3.0 > 1.3.
        let fires = vec![
            fire(2025, 10.0),
            fire(2024, 10.0),
            fire(2023, 10.0),
            fire(2018, 10.0),
        ];
        assert_eq!(analyze_exposure(&fires, YEAR).trend, FireTrend::Increasing);
    }

    #[test]
    fn trend_decreasing_when_activity_falls_off() {
        // 1 recent fire vs 4 prior: ratio 0.25 < 0.7.
        let fires = vec![
            fire(2025, 10.0),
            fire(2019, 10.0),
            fire(2018, 10.0),
            fire(2018, 20.0),
            fire(2017, 10.0),
        ];
        assert_eq!(analyze_exposure(&fires, YEAR).trend, FireTrend::Decreasing);
    }

    #[test]
    fn trend_stable_in_between() {
        // 2 recent vs 2 prior: ratio 1.0.
        let fires = vec![
            fire(2025, 10.0),
            fire(2024, 10.0),
            fire(2019, 10.0),
            fire(2018, 10.0),
        ];
        assert_eq!(analyze_exposure(&fires, YEAR).trend, FireTrend::Stable);
    }

    #[test]
    fn old_fires_with_no_prior_window_are_stable() {
        // Activity entirely before both windows.
        let fires = vec![fire(2005, 10.0), fire(2006, 10.0)];
        assert_eq!(analyze_exposure(&fires, YEAR).trend, FireTrend::Stable);
    }

    #[test]
    fn identical_inputs_produce_identical_scores() {
        let fires = vec![fire(2024, 1_500.0), fire(2020, 800.0)];
        let a = analyze_exposure(&fires, YEAR);
        let b = analyze_exposure(&fires, YEAR);
        assert!((a.score - b.score).abs() < f64::EPSILON);
        assert_eq!(a.trend, b.trend);
    }
}
