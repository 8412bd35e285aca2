//! Enumeration types shared across the Wildrisk workspace.
//!
//! Wire names use `snake_case` because the dashboard and the government
//! feed adapters exchange these values as JSON strings
//! (`"fire_centre"`, `"very_high"`, `"state_updated"`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Region identity
// ---------------------------------------------------------------------------

/// The kind of administrative area a region record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    /// An incorporated municipality.
    Municipality,
    /// A provincial fire centre (top-level wildfire management area).
    FireCentre,
    /// A fire zone within a fire centre.
    FireZone,
    /// A regional district.
    RegionalDistrict,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Risk category bands derived from the overall 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Overall score below 20.
    Low,
    /// Overall score in [20, 40).
    Moderate,
    /// Overall score in [40, 60).
    High,
    /// Overall score in [60, 80).
    VeryHigh,
    /// Overall score 80 or above.
    Extreme,
}

impl RiskCategory {
    /// Map an overall score to its category band.
    ///
    /// The bands are fixed at 20/40/60/80. The score is expected to be in
    /// [0, 100]; out-of-range values clamp to the nearest band.
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::Low
        } else if score < 40.0 {
            Self::Moderate
        } else if score < 60.0 {
            Self::High
        } else if score < 80.0 {
            Self::VeryHigh
        } else {
            Self::Extreme
        }
    }
}

/// Direction of recent fire activity relative to the prior window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum FireTrend {
    /// Recent fire counts exceed the prior window by more than 30%.
    Increasing,
    /// Recent fire counts fall short of the prior window by more than 30%.
    Decreasing,
    /// Recent activity is comparable to the prior window.
    Stable,
}

/// Year-over-year variability of wildfire losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum LossVolatility {
    /// Coefficient of variation above 1.5.
    High,
    /// Coefficient of variation above 0.7.
    Moderate,
    /// Coefficient of variation at or below 0.7.
    Low,
}

// ---------------------------------------------------------------------------
// Zoning
// ---------------------------------------------------------------------------

/// Land-use category of a zone record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ZoneCategory {
    /// Housing and residential subdivisions.
    Residential,
    /// Retail, office, and service uses.
    Commercial,
    /// Manufacturing, processing, and warehousing.
    Industrial,
    /// Farmland and agricultural reserve.
    Agricultural,
    /// Parks, greenways, and recreation land.
    Parkland,
    /// Low-density rural holdings.
    Rural,
    /// Combined residential/commercial designations.
    MixedUse,
}

/// Whether a zone is built out or still undeveloped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStatus {
    /// The zone contains existing structures or servicing.
    Developed,
    /// The zone is designated but not yet built out.
    Underdeveloped,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The eight pipeline stages, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Ensure every tracked region has a store record.
    Initialization,
    /// Fetch historical fires and yearly statistics per region.
    WildfireIngestion,
    /// Fetch zoning records per region.
    ZoningIngestion,
    /// Recompute per-region data quality.
    DataValidation,
    /// Score regions whose data quality passed validation.
    RiskScoring,
    /// Build and append risk reports for scored regions.
    ReportGeneration,
    /// Emit a sync event and snapshot counters.
    StateSync,
    /// Trim the event log and drop expired constraints.
    Cleanup,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [Self; 8] = [
        Self::Initialization,
        Self::WildfireIngestion,
        Self::ZoningIngestion,
        Self::DataValidation,
        Self::RiskScoring,
        Self::ReportGeneration,
        Self::StateSync,
        Self::Cleanup,
    ];

    /// Stable wire/log name for the stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::WildfireIngestion => "wildfire_ingestion",
            Self::ZoningIngestion => "zoning_ingestion",
            Self::DataValidation => "data_validation",
            Self::RiskScoring => "risk_scoring",
            Self::ReportGeneration => "report_generation",
            Self::StateSync => "state_sync",
            Self::Cleanup => "cleanup",
        }
    }
}

// ---------------------------------------------------------------------------
// Agent crew
// ---------------------------------------------------------------------------

/// The three sequential crew stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CrewStage {
    /// Scores completeness and reliability of the region's facts.
    DataQualityValidator,
    /// Computes the risk score and report, persists them to the store.
    RiskScorer,
    /// Derives the prioritized mitigation action list.
    MitigationStrategist,
}

impl CrewStage {
    /// Stable agent identifier used in communication-log messages.
    pub const fn agent_id(self) -> &'static str {
        match self {
            Self::DataQualityValidator => "data_quality_validator",
            Self::RiskScorer => "risk_scorer",
            Self::MitigationStrategist => "mitigation_strategist",
        }
    }

    /// The stage that runs after this one, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::DataQualityValidator => Some(Self::RiskScorer),
            Self::RiskScorer => Some(Self::MitigationStrategist),
            Self::MitigationStrategist => None,
        }
    }
}

/// Lifecycle status of a crew run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CrewStatus {
    /// Stages are still executing.
    Running,
    /// All three stages finished.
    Completed,
    /// A stage error aborted the run.
    Failed,
}

/// Urgency of a mitigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    /// Must start immediately.
    Critical,
    /// Should start within the current planning cycle.
    High,
    /// Schedule within the next budget year.
    Medium,
    /// Opportunistic improvement.
    Low,
}

/// Which lever a mitigation action pulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum MitigationCategory {
    /// Reduce the chance of ignition or spread.
    Prevention,
    /// Improve readiness before an event.
    Preparedness,
    /// Reduce damage when an event occurs.
    Mitigation,
    /// Transfer residual financial risk.
    Insurance,
}

// ---------------------------------------------------------------------------
// Store events
// ---------------------------------------------------------------------------

/// What a store event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A region record was merged via `set`.
    StateUpdated,
    /// A region record was created lazily on first write.
    RegionCreated,
    /// A region's risk score was written and rankings recomputed.
    RiskScoreUpdated,
    /// A full pipeline run completed.
    PipelineCompleted,
    /// The store was reset to its initial empty state.
    StoreReset,
}

/// Processing status stamped onto an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Freshly emitted, not yet consumed by an observer.
    Pending,
    /// Acknowledged by an observer.
    Processed,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_bands_match_thresholds() {
        assert_eq!(RiskCategory::from_score(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(19.9), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(20.0), RiskCategory::Moderate);
        assert_eq!(RiskCategory::from_score(39.9), RiskCategory::Moderate);
        assert_eq!(RiskCategory::from_score(40.0), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(59.9), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(60.0), RiskCategory::VeryHigh);
        assert_eq!(RiskCategory::from_score(79.9), RiskCategory::VeryHigh);
        assert_eq!(RiskCategory::from_score(80.0), RiskCategory::Extreme);
        assert_eq!(RiskCategory::from_score(100.0), RiskCategory::Extreme);
    }

    #[test]
    fn region_type_wire_names_are_snake_case() {
        let json = serde_json::to_string(&RegionType::FireCentre).unwrap();
        assert_eq!(json, "\"fire_centre\"");
        let back: RegionType = serde_json::from_str("\"regional_district\"").unwrap();
        assert_eq!(back, RegionType::RegionalDistrict);
    }

    #[test]
    fn pipeline_stages_are_ordered() {
        assert_eq!(PipelineStage::ALL.len(), 8);
        assert_eq!(
            PipelineStage::ALL.first().copied(),
            Some(PipelineStage::Initialization)
        );
        assert_eq!(
            PipelineStage::ALL.last().copied(),
            Some(PipelineStage::Cleanup)
        );
        assert_eq!(PipelineStage::RiskScoring.as_str(), "risk_scoring");
    }

    #[test]
    fn crew_stages_chain_in_order() {
        assert_eq!(
            CrewStage::DataQualityValidator.next(),
            Some(CrewStage::RiskScorer)
        );
        assert_eq!(
            CrewStage::RiskScorer.next(),
            Some(CrewStage::MitigationStrategist)
        );
        assert_eq!(CrewStage::MitigationStrategist.next(), None);
    }
}
