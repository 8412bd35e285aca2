//! Stage 2: risk scorer.
//!
//! Computes the region's risk score and report and persists both to
//! the store before the strategist runs. If this stage fails after a
//! write, the write stands; crew runs are at-least-once, not
//! transactional.

use chrono::{Datelike, Utc};
use wildrisk_scoring::{build_report, score_region};
use wildrisk_store::RegionStore;
use wildrisk_types::{AgentConclusion, ConclusionId, CrewStage};

use crate::error::CrewError;
use crate::state::{CrewState, RiskAnalysis};

/// Score the region, persist score and report, and record the outcome.
///
/// Returns the stage's conclusion for the run-scoped accumulator.
///
/// # Errors
///
/// Returns [`CrewError::RegionNotFound`] if the region vanished from
/// the store mid-run, or [`CrewError::Store`] if a write fails.
pub fn run_scorer(state: &mut CrewState, store: &mut RegionStore) -> Result<AgentConclusion, CrewError> {
    let region = store
        .get(&state.region_id)
        .cloned()
        .ok_or_else(|| CrewError::RegionNotFound(state.region_id.clone()))?;

    let score = score_region(&region.hazard_data, &region.zoning_data, Utc::now().year());
    store.update_risk_score(&state.region_id, score.clone())?;

    let report = build_report(state.region_id.clone(), &score);
    let report_id = report.id;
    store.append_report(&state.region_id, report)?;

    tracing::info!(
        region = %state.region_id,
        overall_score = score.overall_score,
        category = ?score.category,
        "risk score and report persisted"
    );

    let conclusion = AgentConclusion {
        id: ConclusionId::new(),
        agent: CrewStage::RiskScorer,
        summary: format!(
            "{} scored {:.0}/100 ({:?} risk): exposure {:.1}, historical loss {:.1}, vulnerability {:.1}",
            region.region_name,
            score.overall_score,
            score.category,
            score.exposure.score,
            score.historical_loss.score,
            score.vulnerability.score,
        ),
        confidence: score.confidence,
        sources: vec![
            "historical fire perimeters".to_owned(),
            "yearly wildfire statistics".to_owned(),
            "zoning records".to_owned(),
        ],
        created_at: Utc::now(),
    };

    state.log_message(
        CrewStage::RiskScorer,
        "computed the weighted composite score from current store facts".to_owned(),
        "scored region and generated report".to_owned(),
        format!(
            "{} fires, {} yearly statistics, {} zones",
            region.hazard_data.fires.len(),
            region.hazard_data.statistics.len(),
            region.zoning_data.zones.len(),
        ),
        format!("overall score {:.0}, report {report_id}", score.overall_score),
    );
    state.risk_analysis = Some(RiskAnalysis { score, report_id });

    Ok(conclusion)
}
