//! Crew orchestration.
//!
//! [`AgentCrew::run`] drives the three stages in order against one
//! region. Each stage's conclusion is appended to the store ledger as
//! soon as the stage finishes, so an abort keeps everything completed
//! stages wrote; there is no rollback. The returned [`CrewRun`] carries
//! only the conclusions from this invocation -- the store ledger is the
//! accumulating record across runs.

use wildrisk_store::RegionStore;
use wildrisk_types::{AgentConclusion, CrewStage, CrewStatus, RegionId};

use crate::advisor::{TextAdvisor, create_advisor};
use crate::config::AdvisorConfig;
use crate::error::CrewError;
use crate::prompt::PromptEngine;
use crate::state::CrewState;
use crate::{scorer, strategist, validator};

/// The three-stage analysis crew.
pub struct AgentCrew {
    advisor: TextAdvisor,
    prompts: PromptEngine,
}

/// The outcome of one crew run.
#[derive(Debug)]
pub struct CrewRun {
    /// Final run state, including the communication log.
    pub state: CrewState,
    /// Conclusions produced by this invocation only.
    pub conclusions: Vec<AgentConclusion>,
}

impl AgentCrew {
    /// Create a crew around the given advisor.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::Template`] if an embedded prompt template
    /// fails to parse.
    pub fn new(advisor: TextAdvisor) -> Result<Self, CrewError> {
        Ok(Self {
            advisor,
            prompts: PromptEngine::new()?,
        })
    }

    /// Create a crew from advisor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::Template`] if an embedded prompt template
    /// fails to parse.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, CrewError> {
        Self::new(create_advisor(config))
    }

    /// Run all three stages against `region_id`.
    ///
    /// The store is checked before any stage runs: an unknown region
    /// returns [`CrewError::RegionNotFound`] with the store untouched.
    /// After that, each stage persists as it goes; a later failure
    /// leaves earlier writes in place.
    ///
    /// # Errors
    ///
    /// Returns [`CrewError::RegionNotFound`] for an unknown region, or
    /// the failing stage's error wrapped per its documentation.
    pub async fn run(
        &self,
        store: &mut RegionStore,
        region_id: &RegionId,
    ) -> Result<CrewRun, CrewError> {
        let Some(region) = store.get(region_id).cloned() else {
            return Err(CrewError::RegionNotFound(region_id.clone()));
        };

        tracing::info!(region = %region_id, advisor = self.advisor.name(), "crew run started");

        let mut state = CrewState::new(region_id.clone());
        let mut conclusions = Vec::new();

        state.current_stage = CrewStage::DataQualityValidator;
        let conclusion = validator::run_validator(&mut state, &region);
        record(store, region_id, &mut conclusions, conclusion)?;

        state.current_stage = CrewStage::RiskScorer;
        match scorer::run_scorer(&mut state, store) {
            Ok(conclusion) => record(store, region_id, &mut conclusions, conclusion)?,
            Err(err) => return Err(abort(&mut state, CrewStage::RiskScorer, err)),
        }

        state.current_stage = CrewStage::MitigationStrategist;
        match strategist::run_strategist(&mut state, &region.region_name, &self.advisor, &self.prompts)
            .await
        {
            Ok(conclusion) => record(store, region_id, &mut conclusions, conclusion)?,
            Err(err) => return Err(abort(&mut state, CrewStage::MitigationStrategist, err)),
        }

        state.status = CrewStatus::Completed;
        tracing::info!(
            region = %region_id,
            conclusions = conclusions.len(),
            messages = state.communication_log.len(),
            "crew run completed"
        );

        Ok(CrewRun { state, conclusions })
    }
}

/// Persist a stage conclusion to the ledger and the run accumulator.
fn record(
    store: &mut RegionStore,
    region_id: &RegionId,
    conclusions: &mut Vec<AgentConclusion>,
    conclusion: AgentConclusion,
) -> Result<(), CrewError> {
    store.append_conclusion(region_id, conclusion.clone())?;
    conclusions.push(conclusion);
    Ok(())
}

/// Mark the run failed and wrap the stage error.
fn abort(state: &mut CrewState, stage: CrewStage, err: CrewError) -> CrewError {
    state.status = CrewStatus::Failed;
    tracing::warn!(region = %state.region_id, stage = ?stage, error = %err, "crew run aborted");
    match err {
        already @ CrewError::StageAborted { .. } => already,
        other => CrewError::StageAborted {
            stage,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wildrisk_store::RegionPatch;
    use wildrisk_types::{
        DevelopmentStatus, FireRecord, YearlyStat, Zone, ZoneCategory,
    };

    fn make_crew() -> AgentCrew {
        AgentCrew::new(TextAdvisor::Disabled).unwrap()
    }

    fn make_store() -> (RegionStore, RegionId) {
        let mut store = RegionStore::new();
        let id = RegionId::new("Kelowna");
        store
            .set(
                &id,
                RegionPatch {
                    region_name: Some("Kelowna".to_owned()),
                    ..RegionPatch::default()
                },
            )
            .unwrap();
        let fires = (0..12)
            .map(|i| FireRecord {
                fire_number: format!("K{i:05}"),
                year: 2024,
                size_ha: 1_200.0,
                cause: Some("Lightning".to_owned()),
            })
            .collect();
        let statistics = (0..4)
            .map(|i| YearlyStat {
                year: 2021_i32.saturating_add(i),
                total_cost: 6_000_000.0,
                structures_destroyed: 14,
                fire_count: 9,
                hectares_burned: 3_000.0,
            })
            .collect();
        store.update_hazard_data(&id, fires, statistics).unwrap();
        store
            .update_zoning_data(
                &id,
                vec![Zone {
                    zone_id: "Z-100".to_owned(),
                    municipality: "Kelowna".to_owned(),
                    category: ZoneCategory::Residential,
                    status: DevelopmentStatus::Developed,
                    area_ha: 450.0,
                }],
            )
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn unknown_region_aborts_without_touching_the_store() {
        let crew = make_crew();
        let mut store = RegionStore::new();
        let missing = RegionId::new("Atlantis");
        let version_before = store.version();

        let err = crew.run(&mut store, &missing).await.unwrap_err();

        assert!(matches!(err, CrewError::RegionNotFound(id) if id == missing));
        assert_eq!(store.version(), version_before);
        assert_eq!(store.region_count(), 0);
    }

    #[tokio::test]
    async fn completed_run_walks_all_three_stages() {
        let crew = make_crew();
        let (mut store, id) = make_store();

        let run = crew.run(&mut store, &id).await.unwrap();

        assert_eq!(run.state.status, CrewStatus::Completed);
        assert_eq!(run.conclusions.len(), 3);
        let stages: Vec<CrewStage> = run.conclusions.iter().map(|c| c.agent).collect();
        assert_eq!(
            stages,
            vec![
                CrewStage::DataQualityValidator,
                CrewStage::RiskScorer,
                CrewStage::MitigationStrategist,
            ]
        );

        let region = store.get(&id).unwrap();
        assert!(region.risk_score.is_some());
        assert_eq!(region.reports.len(), 1);
        assert!(run.state.mitigation_strategy.is_some());
    }

    #[tokio::test]
    async fn each_run_returns_only_its_own_conclusions() {
        let crew = make_crew();
        let (mut store, id) = make_store();

        let first = crew.run(&mut store, &id).await.unwrap();
        let second = crew.run(&mut store, &id).await.unwrap();

        assert_eq!(first.conclusions.len(), 3);
        assert_eq!(second.conclusions.len(), 3);

        // The ledger accumulates across runs; the run outputs do not.
        let region = store.get(&id).unwrap();
        assert_eq!(region.agent_conclusions.len(), 6);
        for stale in &first.conclusions {
            assert!(second.conclusions.iter().all(|fresh| fresh.id != stale.id));
        }
    }

    #[tokio::test]
    async fn communication_log_chains_the_agent_ids() {
        let crew = make_crew();
        let (mut store, id) = make_store();

        let run = crew.run(&mut store, &id).await.unwrap();

        assert_eq!(run.state.communication_log.len(), 3);
        let next_ids: Vec<Option<String>> = run
            .state
            .communication_log
            .iter()
            .map(|m| m.next_agent_id.clone())
            .collect();
        assert_eq!(
            next_ids,
            vec![
                Some("risk_scorer".to_owned()),
                Some("mitigation_strategist".to_owned()),
                None,
            ]
        );
    }

    #[tokio::test]
    async fn sparse_region_is_analyzed_despite_failing_readiness() {
        let crew = make_crew();
        let mut store = RegionStore::new();
        let id = RegionId::new("Ghost Town");
        store
            .set(
                &id,
                RegionPatch {
                    region_name: Some("Ghost Town".to_owned()),
                    ..RegionPatch::default()
                },
            )
            .unwrap();

        let run = crew.run(&mut store, &id).await.unwrap();

        assert_eq!(run.state.status, CrewStatus::Completed);
        let analysis = run.state.data_analysis.unwrap();
        assert!(!analysis.meets_readiness);
        // Empty-data floors still produce a score.
        assert!(store.get(&id).unwrap().risk_score.is_some());
    }
}
