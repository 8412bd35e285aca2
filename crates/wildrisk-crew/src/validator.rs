//! Stage 1: data-quality validator.
//!
//! Scores how complete and reliable a region's facts are before any
//! scoring happens. A region below the readiness threshold gets a
//! warning in the log and a low-confidence conclusion, but the run
//! continues -- downstream math has documented floors for sparse facts.

use chrono::Utc;
use wildrisk_types::{AgentConclusion, ConclusionId, CrewStage, Region};

use crate::state::{CrewState, DataAnalysis};

/// Minimum completeness and reliability for a region to be considered
/// analysis-ready.
pub const READINESS_THRESHOLD: f64 = 60.0;

const COMPLETENESS_SLICE: f64 = 25.0;

/// Assess the region's facts and record a [`DataAnalysis`] on the state.
///
/// Returns the stage's conclusion for the run-scoped accumulator.
pub fn run_validator(state: &mut CrewState, region: &Region) -> AgentConclusion {
    let mut completeness = 0.0;
    let mut notes = Vec::new();

    if region.hazard_data.fires.is_empty() {
        notes.push("no historical fire records".to_owned());
    } else {
        completeness += COMPLETENESS_SLICE;
    }
    if region.hazard_data.statistics.is_empty() {
        notes.push("no yearly loss statistics".to_owned());
    } else {
        completeness += COMPLETENESS_SLICE;
    }
    if region.zoning_data.zones.is_empty() {
        notes.push("no zoning records".to_owned());
    } else {
        completeness += COMPLETENESS_SLICE;
    }
    if region.hazard_data.last_updated.is_none() {
        notes.push("hazard facts never refreshed".to_owned());
    } else {
        completeness += COMPLETENESS_SLICE;
    }

    let mut reliability = 40.0;
    if region.hazard_data.fires.len() >= 10 {
        reliability += 20.0;
    }
    if region.hazard_data.statistics.len() >= 3 {
        reliability += 20.0;
    }
    if region.data_quality.as_ref().is_some_and(|q| q.is_valid) {
        reliability += 20.0;
    }

    let meets_readiness = completeness >= READINESS_THRESHOLD && reliability >= READINESS_THRESHOLD;
    if meets_readiness {
        tracing::debug!(region = %region.region_id, completeness, reliability, "region is analysis-ready");
    } else {
        tracing::warn!(
            region = %region.region_id,
            completeness,
            reliability,
            "region facts below readiness threshold, proceeding anyway"
        );
    }

    let summary = format!(
        "Data check for {}: completeness {completeness:.0}/100, reliability {reliability:.0}/100{}",
        region.region_name,
        if meets_readiness {
            String::new()
        } else {
            format!(" ({})", notes.join("; "))
        }
    );

    let conclusion = AgentConclusion {
        id: ConclusionId::new(),
        agent: CrewStage::DataQualityValidator,
        summary,
        confidence: (reliability / 100.0).clamp(0.1, 0.95),
        sources: present_sources(region),
        created_at: Utc::now(),
    };

    state.log_message(
        CrewStage::DataQualityValidator,
        "assessed four fact groups against the readiness threshold".to_owned(),
        "validated region data quality".to_owned(),
        format!("region {}", region.region_id),
        format!("completeness {completeness:.0}, reliability {reliability:.0}"),
    );
    state.data_analysis = Some(DataAnalysis {
        completeness,
        reliability,
        meets_readiness,
        notes,
    });

    conclusion
}

fn present_sources(region: &Region) -> Vec<String> {
    let mut sources = Vec::new();
    if !region.hazard_data.fires.is_empty() {
        sources.push("historical fire perimeters".to_owned());
    }
    if !region.hazard_data.statistics.is_empty() {
        sources.push("yearly wildfire statistics".to_owned());
    }
    if !region.zoning_data.zones.is_empty() {
        sources.push("zoning records".to_owned());
    }
    sources
}
