//! Stage 3: mitigation strategist.
//!
//! Derives a prioritized action list from the persisted risk score.
//! Action selection, costs, and risk-reduction estimates are fixed
//! rules; the optional advisor only contributes narrative prose, and
//! every advisor call falls back to deterministic text.

use chrono::Utc;
use wildrisk_types::{
    ActionPriority, AgentConclusion, ConclusionId, CrewStage, MitigationAction,
    MitigationCategory, MitigationStrategy, RiskCategory, RiskScore,
};

use crate::advisor::TextAdvisor;
use crate::error::CrewError;
use crate::prompt::{PromptEngine, StrategistContext};
use crate::state::CrewState;

/// Ceiling on the aggregate risk-reduction estimate, in score points.
///
/// Actions overlap: fuel breaks and retrofits defend against the same
/// fires, so summed per-action estimates overstate the combined effect.
pub const MAX_AGGREGATE_RISK_REDUCTION: f64 = 30.0;

const EXPOSURE_ACTION_THRESHOLD: f64 = 25.0;
const LOSS_ACTION_THRESHOLD: f64 = 20.0;
const DEVELOPED_ACTION_THRESHOLD: f64 = 50.0;
const VULNERABILITY_ACTION_THRESHOLD: f64 = 30.0;

/// Build the deterministic action list for a score.
///
/// Rules are keyed to the sub-scores that drove the overall number, so
/// the plan always addresses the region's actual risk drivers. The
/// insurance review is unconditional.
pub fn plan_actions(score: &RiskScore) -> Vec<MitigationAction> {
    let mut actions = Vec::new();

    if score.exposure.score >= EXPOSURE_ACTION_THRESHOLD {
        let priority = if matches!(score.category, RiskCategory::Extreme | RiskCategory::VeryHigh) {
            ActionPriority::Critical
        } else {
            ActionPriority::High
        };
        actions.push(MitigationAction {
            title: "Community fuel break and FireSmart program".to_owned(),
            priority,
            category: MitigationCategory::Prevention,
            estimated_cost: 2_500_000.0,
            timeframe_months: 18,
            expected_risk_reduction: 8.0,
            stakeholders: vec![
                "municipality".to_owned(),
                "BC Wildfire Service".to_owned(),
            ],
        });
    }

    if score.historical_loss.score >= LOSS_ACTION_THRESHOLD {
        actions.push(MitigationAction {
            title: "Update the emergency response and evacuation plan".to_owned(),
            priority: ActionPriority::High,
            category: MitigationCategory::Preparedness,
            estimated_cost: 350_000.0,
            timeframe_months: 6,
            expected_risk_reduction: 4.0,
            stakeholders: vec![
                "municipality".to_owned(),
                "Emergency Management BC".to_owned(),
            ],
        });
    }

    if score.vulnerability.developed_percentage >= DEVELOPED_ACTION_THRESHOLD {
        actions.push(MitigationAction {
            title: "Ember-resistant retrofit incentives for existing structures".to_owned(),
            priority: ActionPriority::Medium,
            category: MitigationCategory::Mitigation,
            estimated_cost: 1_800_000.0,
            timeframe_months: 24,
            expected_risk_reduction: 6.0,
            stakeholders: vec!["municipality".to_owned(), "property owners".to_owned()],
        });
    }

    if score.vulnerability.score >= VULNERABILITY_ACTION_THRESHOLD {
        actions.push(MitigationAction {
            title: "Defensible-space requirements for new development".to_owned(),
            priority: ActionPriority::Medium,
            category: MitigationCategory::Mitigation,
            estimated_cost: 150_000.0,
            timeframe_months: 12,
            expected_risk_reduction: 3.0,
            stakeholders: vec!["municipality".to_owned(), "developers".to_owned()],
        });
    }

    actions.push(MitigationAction {
        title: "Review insurance coverage against projected losses".to_owned(),
        priority: ActionPriority::Low,
        category: MitigationCategory::Insurance,
        estimated_cost: 50_000.0,
        timeframe_months: 3,
        expected_risk_reduction: 1.5,
        stakeholders: vec!["insurers".to_owned(), "property owners".to_owned()],
    });

    actions
}

/// Assemble the mitigation strategy and record it on the state.
///
/// Returns the stage's conclusion for the run-scoped accumulator. The
/// conclusion summary is advisor prose when a backend is configured
/// and reachable, deterministic text otherwise.
///
/// # Errors
///
/// Returns [`CrewError::StageAborted`] if the scorer never ran, which
/// means the stage ordering was violated.
pub async fn run_strategist(
    state: &mut CrewState,
    region_name: &str,
    advisor: &TextAdvisor,
    prompts: &PromptEngine,
) -> Result<AgentConclusion, CrewError> {
    let score = state
        .risk_analysis
        .as_ref()
        .map(|analysis| analysis.score.clone())
        .ok_or_else(|| CrewError::StageAborted {
            stage: CrewStage::MitigationStrategist,
            reason: "no risk score on the run state".to_owned(),
        })?;

    let actions = plan_actions(&score);
    let total_cost: f64 = actions.iter().map(|a| a.estimated_cost).sum();
    let summed_reduction: f64 = actions.iter().map(|a| a.expected_risk_reduction).sum();
    let strategy = MitigationStrategy {
        actions,
        total_cost,
        aggregate_risk_reduction: summed_reduction.min(MAX_AGGREGATE_RISK_REDUCTION),
    };

    let summary = narrate(region_name, &score, &strategy, advisor, prompts).await;

    tracing::info!(
        region = %state.region_id,
        actions = strategy.actions.len(),
        total_cost,
        aggregate_risk_reduction = strategy.aggregate_risk_reduction,
        "mitigation strategy assembled"
    );

    let conclusion = AgentConclusion {
        id: ConclusionId::new(),
        agent: CrewStage::MitigationStrategist,
        summary,
        confidence: 0.7,
        sources: vec!["persisted risk score".to_owned(), "mitigation planning rules".to_owned()],
        created_at: Utc::now(),
    };

    state.log_message(
        CrewStage::MitigationStrategist,
        "selected actions keyed to the sub-scores that drove the overall score".to_owned(),
        "assembled mitigation strategy".to_owned(),
        format!("overall score {:.0} ({:?})", score.overall_score, score.category),
        format!(
            "{} actions, ${total_cost:.0}, {:.1} point reduction estimate",
            strategy.actions.len(),
            strategy.aggregate_risk_reduction,
        ),
    );
    state.mitigation_strategy = Some(strategy);

    Ok(conclusion)
}

/// Produce the strategy narrative, preferring advisor prose.
async fn narrate(
    region_name: &str,
    score: &RiskScore,
    strategy: &MitigationStrategy,
    advisor: &TextAdvisor,
    prompts: &PromptEngine,
) -> String {
    // overall_score is clamped to [0, 100] by the scorer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let overall_score = score.overall_score.round() as u32;

    let context = StrategistContext {
        region_name: region_name.to_owned(),
        overall_score,
        risk_category: format!("{:?}", score.category),
        exposure: score.exposure.score,
        historical_loss: score.historical_loss.score,
        vulnerability: score.vulnerability.score,
        action_titles: strategy.actions.iter().map(|a| a.title.clone()).collect(),
        total_cost: strategy.total_cost,
    };

    let advised = match prompts.render_strategist(&context) {
        Ok(prompt) => advisor.advise(&prompt).await,
        Err(err) => {
            tracing::warn!(error = %err, "strategist prompt failed to render, using fallback text");
            None
        }
    };

    advised.unwrap_or_else(|| fallback_narrative(region_name, score, strategy))
}

/// Deterministic narrative used when no advisor text is available.
fn fallback_narrative(region_name: &str, score: &RiskScore, strategy: &MitigationStrategy) -> String {
    format!(
        "{region_name} rates {:.0}/100 ({:?}). Planned {} mitigation actions totalling ${:.0}, \
         with an estimated combined reduction of {:.1} score points.",
        score.overall_score,
        score.category,
        strategy.actions.len(),
        strategy.total_cost,
        strategy.aggregate_risk_reduction,
    )
}
