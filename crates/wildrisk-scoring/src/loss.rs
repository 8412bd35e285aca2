//! Historical-loss analysis from yearly wildfire statistics.
//!
//! Loss measures what wildfire has actually cost the region: average
//! annual cost, structures destroyed, and how concentrated losses are in
//! a single bad year. The volatility label comes from the coefficient of
//! variation of yearly cost.

use wildrisk_types::{LossAnalysis, LossVolatility, YearlyStat};

// ---------------------------------------------------------------------------
// Component caps and ramps
// ---------------------------------------------------------------------------

/// Maximum contribution of average annual cost.
const COST_CAP: f64 = 50.0;

/// Average annual cost at which the cost component saturates, in dollars.
const COST_SATURATION: f64 = 10_000_000.0;

/// Maximum contribution of structures destroyed.
const STRUCTURE_CAP: f64 = 30.0;

/// Average annual structures destroyed at which the component saturates.
const STRUCTURE_SATURATION: f64 = 100.0;

/// Maximum contribution of loss concentration.
const CONCENTRATION_CAP: f64 = 20.0;

/// Multiplier applied to the peak-year cost fraction.
const CONCENTRATION_RAMP: f64 = 40.0;

/// Coefficient of variation above which volatility is high.
const VOLATILITY_HIGH: f64 = 1.5;

/// Coefficient of variation above which volatility is moderate.
const VOLATILITY_MODERATE: f64 = 0.7;

/// Loss score for a region with no yearly statistics at all.
///
/// A deliberate design floor: missing loss history does not mean zero
/// loss risk.
pub const EMPTY_LOSS_FLOOR: f64 = 15.0;

/// Analyze a region's historical wildfire losses.
pub fn analyze_loss(statistics: &[YearlyStat]) -> LossAnalysis {
    if statistics.is_empty() {
        return LossAnalysis {
            score: EMPTY_LOSS_FLOOR,
            cost_score: 0.0,
            structure_score: 0.0,
            concentration_score: 0.0,
            avg_annual_cost: 0.0,
            total_cost: 0.0,
            volatility: LossVolatility::Low,
        };
    }

    let years = u32::try_from(statistics.len()).unwrap_or(u32::MAX);
    let years_f = f64::from(years);

    let total_cost: f64 = statistics.iter().map(|s| s.total_cost.max(0.0)).sum();
    let avg_annual_cost = total_cost / years_f;

    let total_structures: u64 = statistics
        .iter()
        .map(|s| u64::from(s.structures_destroyed))
        .fold(0u64, u64::saturating_add);
    let avg_structures = u64_to_f64(total_structures) / years_f;

    let peak_cost = statistics
        .iter()
        .map(|s| s.total_cost.max(0.0))
        .fold(0.0_f64, f64::max);
    let peak_fraction = if total_cost > 0.0 {
        peak_cost / total_cost
    } else {
        0.0
    };

    let cost_score = (avg_annual_cost / COST_SATURATION * COST_CAP).min(COST_CAP);
    let structure_score =
        (avg_structures / STRUCTURE_SATURATION * STRUCTURE_CAP).min(STRUCTURE_CAP);
    let concentration_score = (peak_fraction * CONCENTRATION_RAMP).min(CONCENTRATION_CAP);

    let score = (cost_score + structure_score + concentration_score).round();

    LossAnalysis {
        score,
        cost_score,
        structure_score,
        concentration_score,
        avg_annual_cost,
        total_cost,
        volatility: volatility(statistics, avg_annual_cost),
    }
}

/// Classify loss volatility from the coefficient of variation of yearly
/// cost (population standard deviation over the mean).
fn volatility(statistics: &[YearlyStat], mean: f64) -> LossVolatility {
    if mean <= 0.0 || statistics.len() < 2 {
        return LossVolatility::Low;
    }
    let years = u32::try_from(statistics.len()).unwrap_or(u32::MAX);
    let variance: f64 = statistics
        .iter()
        .map(|s| {
            let delta = s.total_cost.max(0.0) - mean;
            delta * delta
        })
        .sum::<f64>()
        / f64::from(years);
    let cv = variance.sqrt() / mean;

    if cv > VOLATILITY_HIGH {
        LossVolatility::High
    } else if cv > VOLATILITY_MODERATE {
        LossVolatility::Moderate
    } else {
        LossVolatility::Low
    }
}

/// Convert a structure count to `f64`.
///
/// Counts here are bounded by real-world structure totals, far below the
/// 2^53 precision limit.
#[allow(clippy::cast_precision_loss)]
const fn u64_to_f64(value: u64) -> f64 {
    value as f64
}
