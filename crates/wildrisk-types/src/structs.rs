//! Core entity structs for the Wildrisk analysis system.
//!
//! Covers the region record and its hazard/zoning facts, the risk score
//! with its component analyses, report payloads, the agent conclusion and
//! communication-log entries, store events, and constraints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    ActionPriority, CrewStage, DevelopmentStatus, EventKind, EventStatus, FireTrend,
    LossVolatility, MitigationCategory, RegionType, RiskCategory, ZoneCategory,
};
use crate::ids::{ConclusionId, ConstraintId, EventId, RegionId, ReportId};

// ---------------------------------------------------------------------------
// Hazard facts
// ---------------------------------------------------------------------------

/// One historical wildfire perimeter record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FireRecord {
    /// Provincial fire number (e.g. `"K52125"`).
    pub fire_number: String,
    /// Calendar year the fire burned.
    pub year: i32,
    /// Final perimeter size in hectares.
    pub size_ha: f64,
    /// Recorded cause, when the feed supplies one.
    pub cause: Option<String>,
}

/// Aggregate wildfire statistics for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct YearlyStat {
    /// Calendar year.
    pub year: i32,
    /// Total suppression and damage cost for the year, in dollars.
    pub total_cost: f64,
    /// Structures destroyed during the year.
    pub structures_destroyed: u32,
    /// Number of fires recorded in the year.
    pub fire_count: u32,
    /// Total hectares burned in the year.
    pub hectares_burned: f64,
}

/// A region's historical fire facts and aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HazardData {
    /// Historical fire perimeter records.
    pub fires: Vec<FireRecord>,
    /// Yearly aggregate statistics.
    pub statistics: Vec<YearlyStat>,
    /// When the hazard facts were last refreshed.
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Zoning facts
// ---------------------------------------------------------------------------

/// One parcel/zone record from a zoning feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// The feed's own zone identifier. Never used as a region key.
    pub zone_id: String,
    /// Municipality the zone belongs to, as spelled by the feed.
    pub municipality: String,
    /// Land-use category.
    pub category: ZoneCategory,
    /// Development status.
    pub status: DevelopmentStatus,
    /// Zone area in hectares.
    pub area_ha: f64,
}

/// A region's zoning facts with derived development percentages.
///
/// The percentages are recomputed from the full `zones` list on every
/// write; they are never incremented against prior state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ZoningData {
    /// All zone records for the region.
    pub zones: Vec<Zone>,
    /// Share of total zoned area that is developed, 0-100.
    pub developed_percentage: f64,
    /// Share of total zoned area that is underdeveloped, 0-100.
    pub underdeveloped_percentage: f64,
    /// When the zoning facts were last refreshed.
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Risk score
// ---------------------------------------------------------------------------

/// Exposure analysis derived from historical fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExposureAnalysis {
    /// Combined exposure score, 0-100.
    pub score: f64,
    /// Burned-area component, capped at 40.
    pub area_score: f64,
    /// Recent-frequency component, capped at 30.
    pub frequency_score: f64,
    /// Major-event component, capped at 30.
    pub major_event_score: f64,
    /// Total hectares burned across all records.
    pub total_burned_ha: f64,
    /// Fires recorded in the last five years.
    pub fires_last_5y: u32,
    /// Fires larger than 1,000 hectares.
    pub major_fires: u32,
    /// Direction of recent fire activity.
    pub trend: FireTrend,
}

/// Historical-loss analysis derived from yearly statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LossAnalysis {
    /// Combined loss score, 0-100.
    pub score: f64,
    /// Average-annual-cost component, capped at 50.
    pub cost_score: f64,
    /// Structures-destroyed component, capped at 30.
    pub structure_score: f64,
    /// Peak-year concentration component, capped at 20.
    pub concentration_score: f64,
    /// Average annual cost across the statistics, in dollars.
    pub avg_annual_cost: f64,
    /// Total cost across all years, in dollars.
    pub total_cost: f64,
    /// Year-over-year cost volatility.
    pub volatility: LossVolatility,
}

/// Vulnerability analysis derived from zoning facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VulnerabilityAnalysis {
    /// Combined vulnerability score, 0-100.
    pub score: f64,
    /// Developed-percentage component, capped at 40.
    pub developed_score: f64,
    /// Exposure-value component, capped at 40.
    pub exposure_value_score: f64,
    /// Residential-concentration component, capped at 20.
    pub residential_score: f64,
    /// Estimated replacement value of zoned land, in dollars.
    pub estimated_value: f64,
    /// Developed percentage the analysis saw, 0-100.
    pub developed_percentage: f64,
    /// Estimated resident population across the zones.
    pub population_estimate: f64,
}

/// The weighted composite risk score for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RiskScore {
    /// Weighted overall score, always in [0, 100].
    pub overall_score: f64,
    /// Category band derived from the overall score.
    pub category: RiskCategory,
    /// Exposure component.
    pub exposure: ExposureAnalysis,
    /// Historical-loss component.
    pub historical_loss: LossAnalysis,
    /// Vulnerability component.
    pub vulnerability: VulnerabilityAnalysis,
    /// Climate component, pinned at 60 pending real climate integration.
    pub climate_score: f64,
    /// Confidence in the score, 0.5-0.95.
    pub confidence: f64,
}

/// Validation result describing how usable a region's facts are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DataQuality {
    /// Quality score, 100 minus penalties, floored at 0.
    pub score: f64,
    /// Whether the region's facts are good enough to score.
    pub is_valid: bool,
    /// Human-readable descriptions of each penalty applied.
    pub issues: Vec<String>,
    /// When the validation ran.
    pub checked_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// One cost-projection scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CostScenario {
    /// Scenario name (`baseline`, `moderate_climate`, ...).
    pub name: String,
    /// Multiplier applied to the baseline projection.
    pub multiplier: f64,
    /// Projected annual cost under the scenario, in dollars.
    pub projected_annual_cost: f64,
    /// Lower bound of the confidence interval, in dollars.
    pub low_estimate: f64,
    /// Upper bound of the confidence interval, in dollars.
    pub high_estimate: f64,
}

/// One rung of the disaster-recovery ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RecoveryRung {
    /// Severity label (`minor`, `moderate`, `major`, `catastrophic`).
    pub severity: String,
    /// Estimated damage for an event of this severity, in dollars.
    pub estimated_damage: f64,
    /// Expected recovery time in months.
    pub recovery_months: u32,
    /// Expected insurance payout, in dollars.
    pub insurance_payout: f64,
    /// Expected out-of-pocket cost, in dollars.
    pub out_of_pocket: f64,
}

/// Explainability payload attached to every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Explainability {
    /// Plain-language description of the scoring methodology.
    pub methodology: String,
    /// Names of the data sources the score draws on.
    pub data_sources: Vec<String>,
    /// Scoring weights exposed as a feature-importance map.
    pub feature_importance: BTreeMap<String, f64>,
    /// Known limitations of the analysis.
    pub limitations: Vec<String>,
}

/// A generated risk report for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RiskReport {
    /// Report identifier.
    pub id: ReportId,
    /// The region the report describes.
    pub region_id: RegionId,
    /// Overall score the report was built from.
    pub overall_score: f64,
    /// The four cost-projection scenarios.
    pub cost_projections: Vec<CostScenario>,
    /// The four-rung disaster-recovery ladder.
    pub recovery_ladder: Vec<RecoveryRung>,
    /// Explainability payload.
    pub explainability: Explainability,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Agent crew outputs
// ---------------------------------------------------------------------------

/// One natural-language finding recorded by a crew stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentConclusion {
    /// Conclusion identifier.
    pub id: ConclusionId,
    /// The stage that produced the conclusion.
    pub agent: CrewStage,
    /// The finding itself.
    pub summary: String,
    /// Confidence in the finding, 0-1.
    pub confidence: f64,
    /// Data sources cited by the finding.
    pub sources: Vec<String>,
    /// When the conclusion was recorded.
    pub created_at: DateTime<Utc>,
}

/// One structured entry in the crew communication log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentMessage {
    /// Stable identifier of the stage that wrote the message.
    pub agent_id: String,
    /// When the message was written.
    pub timestamp: DateTime<Utc>,
    /// Why the stage acted as it did.
    pub reasoning: String,
    /// The action the stage took.
    pub action: String,
    /// Summary of the stage's input.
    pub input: String,
    /// Summary of the stage's output.
    pub output: String,
    /// The next stage's agent id, or `None` for the final stage.
    pub next_agent_id: Option<String>,
}

/// One prioritized mitigation action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MitigationAction {
    /// Short action title.
    pub title: String,
    /// Urgency of the action.
    pub priority: ActionPriority,
    /// Which lever the action pulls.
    pub category: MitigationCategory,
    /// Estimated implementation cost, in dollars.
    pub estimated_cost: f64,
    /// Expected implementation timeframe, in months.
    pub timeframe_months: u32,
    /// Expected risk-score reduction from the action, in points.
    pub expected_risk_reduction: f64,
    /// Stakeholders responsible for the action.
    pub stakeholders: Vec<String>,
}

/// The mitigation strategist's full output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MitigationStrategy {
    /// Prioritized action list.
    pub actions: Vec<MitigationAction>,
    /// Sum of estimated costs across all actions, in dollars.
    pub total_cost: f64,
    /// Aggregate risk-reduction estimate, capped at 30 points.
    pub aggregate_risk_reduction: f64,
}

// ---------------------------------------------------------------------------
// Region record
// ---------------------------------------------------------------------------

/// The full state record for one tracked region.
///
/// Region records are created lazily on first write and mutated only
/// through the store's writer methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Region {
    /// Normalized region identifier.
    pub region_id: RegionId,
    /// Display name as supplied by the caller or feed.
    pub region_name: String,
    /// Kind of administrative area.
    pub region_type: RegionType,
    /// Historical fire facts and statistics.
    pub hazard_data: HazardData,
    /// Zoning facts with derived development percentages.
    pub zoning_data: ZoningData,
    /// Risk score; `None` until first scoring.
    pub risk_score: Option<RiskScore>,
    /// Append-only list of generated reports.
    pub reports: Vec<RiskReport>,
    /// Append-only conclusion ledger across analysis runs.
    pub agent_conclusions: Vec<AgentConclusion>,
    /// Most recent validation result.
    pub data_quality: Option<DataQuality>,
    /// When the region was last scored.
    pub last_analyzed: Option<DateTime<Utc>>,
    /// When any field of the record was last written.
    pub last_modified: Option<DateTime<Utc>>,
}

impl Region {
    /// Create a region record with zeroed hazard/zoning defaults.
    pub fn with_defaults(region_id: RegionId, region_name: String, region_type: RegionType) -> Self {
        Self {
            region_id,
            region_name,
            region_type,
            hazard_data: HazardData::default(),
            zoning_data: ZoningData::default(),
            risk_score: None,
            reports: Vec::new(),
            agent_conclusions: Vec::new(),
            data_quality: None,
            last_analyzed: None,
            last_modified: None,
        }
    }
}

/// One row of the derived global ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RankingEntry {
    /// The ranked region.
    pub region_id: RegionId,
    /// Display name of the ranked region.
    pub region_name: String,
    /// The region's overall score.
    pub overall_score: f64,
    /// 1-based position in descending-score order.
    pub rank: u32,
}

// ---------------------------------------------------------------------------
// Events and constraints
// ---------------------------------------------------------------------------

/// One entry in the store's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoreEvent {
    /// Event identifier, assigned on emit.
    pub id: EventId,
    /// What the event records.
    pub kind: EventKind,
    /// The region involved, if the event is region-scoped.
    pub region_id: Option<RegionId>,
    /// Human-readable detail.
    pub detail: String,
    /// Processing status, `Pending` on emit.
    pub status: EventStatus,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

/// A constraint on analysis or mitigation with a validity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Constraint {
    /// Constraint identifier.
    pub id: ConstraintId,
    /// What the constraint requires or forbids.
    pub description: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window; `None` means open-ended.
    pub valid_until: Option<DateTime<Utc>>,
}

impl Constraint {
    /// Whether the constraint is active at the given instant.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if now < self.valid_from {
            return false;
        }
        self.valid_until.is_none_or(|until| now <= until)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn default_region_has_zeroed_facts() {
        let region = Region::with_defaults(
            RegionId::new("Kelowna"),
            String::from("Kelowna"),
            RegionType::Municipality,
        );
        assert!(region.hazard_data.fires.is_empty());
        assert!(region.zoning_data.zones.is_empty());
        assert!(region.risk_score.is_none());
        assert!(region.reports.is_empty());
        assert!(region.agent_conclusions.is_empty());
        assert!(region.last_analyzed.is_none());
    }

    #[test]
    fn constraint_window_bounds() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let constraint = Constraint {
            id: ConstraintId::new(),
            description: String::from("budget freeze"),
            valid_from: from,
            valid_until: Some(until),
        };

        let before = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();

        assert!(!constraint.is_active(before));
        assert!(constraint.is_active(inside));
        assert!(!constraint.is_active(after));
    }

    #[test]
    fn open_ended_constraint_stays_active() {
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let constraint = Constraint {
            id: ConstraintId::new(),
            description: String::from("provincial reporting requirement"),
            valid_from: from,
            valid_until: None,
        };
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert!(constraint.is_active(later));
    }

    #[test]
    fn region_roundtrips_through_json() {
        let region = Region::with_defaults(
            RegionId::new("Cariboo Fire Centre"),
            String::from("Cariboo Fire Centre"),
            RegionType::FireCentre,
        );
        let json = serde_json::to_string(&region).unwrap();
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(region, back);
    }
}
