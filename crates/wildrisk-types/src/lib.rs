//! Shared type definitions for the Wildrisk analysis system.
//!
//! This crate is the single source of truth for all types used across the
//! Wildrisk workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the dashboard collaborator.
//!
//! # Modules
//!
//! - [`ids`] -- Typed UUID wrappers plus the [`RegionId`] slug newtype
//! - [`enums`] -- Enumeration types (region kinds, score bands, stages)
//! - [`structs`] -- Entity structs (regions, facts, scores, reports, events)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActionPriority, CrewStage, CrewStatus, DevelopmentStatus, EventKind, EventStatus, FireTrend,
    LossVolatility, MitigationCategory, PipelineStage, RegionType, RiskCategory, ZoneCategory,
};
pub use ids::{ConclusionId, ConstraintId, EventId, RegionId, ReportId};
pub use structs::{
    AgentConclusion, AgentMessage, Constraint, CostScenario, DataQuality, Explainability,
    ExposureAnalysis, FireRecord, HazardData, LossAnalysis, MitigationAction, MitigationStrategy,
    RankingEntry, RecoveryRung, Region, RiskReport, RiskScore, StoreEvent, VulnerabilityAnalysis,
    YearlyStat, Zone, ZoningData,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::ReportId::export_all();
        let _ = crate::ids::ConclusionId::export_all();
        let _ = crate::ids::ConstraintId::export_all();
        let _ = crate::ids::RegionId::export_all();

        // Enums
        let _ = crate::enums::RegionType::export_all();
        let _ = crate::enums::RiskCategory::export_all();
        let _ = crate::enums::FireTrend::export_all();
        let _ = crate::enums::LossVolatility::export_all();
        let _ = crate::enums::ZoneCategory::export_all();
        let _ = crate::enums::DevelopmentStatus::export_all();
        let _ = crate::enums::PipelineStage::export_all();
        let _ = crate::enums::CrewStage::export_all();
        let _ = crate::enums::CrewStatus::export_all();
        let _ = crate::enums::ActionPriority::export_all();
        let _ = crate::enums::MitigationCategory::export_all();
        let _ = crate::enums::EventKind::export_all();
        let _ = crate::enums::EventStatus::export_all();

        // Structs
        let _ = crate::structs::FireRecord::export_all();
        let _ = crate::structs::YearlyStat::export_all();
        let _ = crate::structs::HazardData::export_all();
        let _ = crate::structs::Zone::export_all();
        let _ = crate::structs::ZoningData::export_all();
        let _ = crate::structs::ExposureAnalysis::export_all();
        let _ = crate::structs::LossAnalysis::export_all();
        let _ = crate::structs::VulnerabilityAnalysis::export_all();
        let _ = crate::structs::RiskScore::export_all();
        let _ = crate::structs::DataQuality::export_all();
        let _ = crate::structs::CostScenario::export_all();
        let _ = crate::structs::RecoveryRung::export_all();
        let _ = crate::structs::Explainability::export_all();
        let _ = crate::structs::RiskReport::export_all();
        let _ = crate::structs::AgentConclusion::export_all();
        let _ = crate::structs::AgentMessage::export_all();
        let _ = crate::structs::MitigationAction::export_all();
        let _ = crate::structs::MitigationStrategy::export_all();
        let _ = crate::structs::Region::export_all();
        let _ = crate::structs::RankingEntry::export_all();
        let _ = crate::structs::StoreEvent::export_all();
        let _ = crate::structs::Constraint::export_all();
    }
}
