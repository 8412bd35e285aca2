//! The 8-stage analysis pipeline.
//!
//! Stages run in a fixed order: initialization, wildfire ingestion,
//! zoning ingestion, data validation, risk scoring, report generation,
//! state sync, cleanup. Each stage is wrapped uniformly -- duration is
//! measured and errors are absorbed into a [`StageResult`] -- so a
//! failing feed never aborts the run. Scoring is the one conditional
//! stage: it is skipped when either ingestion stage failed outright.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{Datelike, Utc};
use futures::future::join_all;
use tracing::{info, warn};
use wildrisk_ingest::{
    FixtureHazardSource, FixtureZoningSource, HazardSource, HttpHazardSource, HttpZoningSource,
    WfsClient, ZoningSource, calculate_development_indicators,
};
use wildrisk_scoring::{report_for_region, score_region};
use wildrisk_store::{RegionPatch, RegionStore};
use wildrisk_types::{EventKind, PipelineStage, RegionId, Zone};

use crate::config::{AnalysisConfig, IngestMode};
use crate::error::PipelineError;
use crate::stages::{PipelineRun, RunSummary, StageResult, ingestion_failed};
use crate::validation::assess_region;

/// What one stage reports back to the uniform wrapper.
struct StageOutput {
    success: bool,
    records_processed: usize,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl StageOutput {
    /// A clean stage that touched `records` records.
    const fn ok(records: usize) -> Self {
        Self {
            success: true,
            records_processed: records,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Success rule for ingestion stages: partial data is still usable,
    /// only a fetch that yields nothing at all fails the stage.
    fn from_ingestion(records: usize, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: errors.is_empty() || records > 0,
            records_processed: records,
            errors,
            warnings,
        }
    }
}

/// The pipeline runner: configuration plus the two feed collaborators.
pub struct PipelineRunner {
    config: AnalysisConfig,
    hazard: HazardSource,
    zoning: ZoningSource,
}

impl PipelineRunner {
    /// Create a runner over explicit sources.
    pub const fn new(config: AnalysisConfig, hazard: HazardSource, zoning: ZoningSource) -> Self {
        Self {
            config,
            hazard,
            zoning,
        }
    }

    /// Build a runner with sources chosen by the configured ingest mode.
    ///
    /// Fixture mode starts with empty fixture sources; callers seed them
    /// via [`PipelineRunner::new`] when they need canned data.
    pub fn from_config(config: AnalysisConfig) -> Result<Self, PipelineError> {
        let (hazard, zoning) = match config.ingest.mode {
            IngestMode::Http => {
                let timeout = Duration::from_millis(config.ingest.request_timeout_ms);
                let client = WfsClient::with_timeout(timeout)?;
                (
                    HazardSource::Http(HttpHazardSource::new(
                        client.clone(),
                        config.ingest.perimeter_url.clone(),
                        config.ingest.statistics_url.clone(),
                    )),
                    ZoningSource::Http(HttpZoningSource::new(
                        client,
                        config.ingest.zoning_url.clone(),
                    )),
                )
            }
            IngestMode::Fixture => (
                HazardSource::Fixture(FixtureHazardSource::new()),
                ZoningSource::Fixture(FixtureZoningSource::new()),
            ),
        };
        Ok(Self::new(config, hazard, zoning))
    }

    /// Execute one full pipeline run against the store.
    ///
    /// Never returns an error: every failure is captured in the stage
    /// results, and `success` reflects whether all eight stages passed.
    pub async fn run(&self, store: &mut RegionStore) -> PipelineRun {
        info!(
            regions = self.config.regions.tracked.len(),
            hazard_source = self.hazard.name(),
            zoning_source = self.zoning.name(),
            "pipeline run starting"
        );

        let mut stage_results: Vec<StageResult> = Vec::with_capacity(PipelineStage::ALL.len());
        for stage in PipelineStage::ALL {
            let started = Instant::now();
            let output = self.execute_stage(stage, store, &stage_results).await;
            // Stage durations are far below the u64 millisecond limit.
            #[allow(clippy::cast_possible_truncation)]
            let duration_ms = started.elapsed().as_millis() as u64;

            if output.success {
                info!(
                    stage = stage.as_str(),
                    duration_ms = duration_ms,
                    records = output.records_processed,
                    warnings = output.warnings.len(),
                    "stage completed"
                );
            } else {
                warn!(
                    stage = stage.as_str(),
                    duration_ms = duration_ms,
                    errors = output.errors.len(),
                    "stage failed"
                );
            }

            stage_results.push(StageResult {
                stage,
                success: output.success,
                duration_ms,
                records_processed: output.records_processed,
                errors: output.errors,
                warnings: output.warnings,
            });
        }

        let summary = self.summarize(store, &stage_results);
        let success = stage_results.iter().all(|r| r.success);
        info!(
            success = success,
            stages_completed = summary.stages_completed,
            regions_analyzed = summary.regions_analyzed,
            "pipeline run finished"
        );
        PipelineRun {
            success,
            stage_results,
            summary,
        }
    }

    async fn execute_stage(
        &self,
        stage: PipelineStage,
        store: &mut RegionStore,
        prior: &[StageResult],
    ) -> StageOutput {
        match stage {
            PipelineStage::Initialization => self.initialize_regions(store),
            PipelineStage::WildfireIngestion => self.ingest_wildfire(store).await,
            PipelineStage::ZoningIngestion => self.ingest_zoning(store).await,
            PipelineStage::DataValidation => self.validate_data(store),
            PipelineStage::RiskScoring => {
                if ingestion_failed(prior) {
                    return StageOutput {
                        success: false,
                        records_processed: 0,
                        errors: Vec::new(),
                        warnings: vec![String::from("skipped: an ingestion stage failed")],
                    };
                }
                self.score_regions(store)
            }
            PipelineStage::ReportGeneration => generate_reports(store),
            PipelineStage::StateSync => sync_state(store),
            PipelineStage::Cleanup => self.cleanup(store),
        }
    }

    /// Stage 1: ensure every tracked region has a store record.
    fn initialize_regions(&self, store: &mut RegionStore) -> StageOutput {
        let mut errors = Vec::new();
        let mut records = 0usize;
        for tracked in &self.config.regions.tracked {
            let id = RegionId::new(&tracked.name);
            let patch = RegionPatch {
                region_name: Some(tracked.name.clone()),
                region_type: Some(tracked.region_type),
                ..RegionPatch::default()
            };
            match store.set(&id, patch) {
                Ok(()) => records = records.saturating_add(1),
                Err(e) => errors.push(format!("{id}: {e}")),
            }
        }
        StageOutput {
            success: errors.is_empty(),
            records_processed: records,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Stage 2: fetch fire perimeters and yearly statistics per region,
    /// concurrently, then fold the results into the store sequentially.
    async fn ingest_wildfire(&self, store: &mut RegionStore) -> StageOutput {
        let tracked = &self.config.regions.tracked;
        let fetches = join_all(tracked.iter().map(|r| self.hazard.fetch(&r.name))).await;

        let mut records = 0usize;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for (region, result) in tracked.iter().zip(fetches) {
            let id = RegionId::new(&region.name);
            match result {
                Ok(fetch) => {
                    warnings.extend(fetch.validation.warnings);
                    let count = fetch
                        .data
                        .fires
                        .len()
                        .saturating_add(fetch.data.statistics.len());
                    match store.update_hazard_data(&id, fetch.data.fires, fetch.data.statistics) {
                        Ok(()) => records = records.saturating_add(count),
                        Err(e) => errors.push(format!("{id}: {e}")),
                    }
                }
                Err(e) => errors.push(format!("{id}: {e}")),
            }
        }
        StageOutput::from_ingestion(records, errors, warnings)
    }

    /// Stage 3: fetch zone records per region, group them by municipality
    /// slug, and replace each region's zoning facts.
    async fn ingest_zoning(&self, store: &mut RegionStore) -> StageOutput {
        let tracked = &self.config.regions.tracked;
        let fetches = join_all(tracked.iter().map(|r| self.zoning.fetch(&r.name))).await;

        let mut all_zones: Vec<Zone> = Vec::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for (region, result) in tracked.iter().zip(fetches) {
            match result {
                Ok(fetch) => {
                    warnings.extend(fetch.validation.warnings);
                    all_zones.extend(fetch.zones);
                }
                Err(e) => errors.push(format!("{}: {e}", RegionId::new(&region.name))),
            }
        }

        let records = all_zones.len();
        let indicators = calculate_development_indicators(&all_zones);

        let mut grouped: BTreeMap<RegionId, Vec<Zone>> = BTreeMap::new();
        for zone in all_zones {
            grouped
                .entry(RegionId::new(&zone.municipality))
                .or_default()
                .push(zone);
        }
        for indicator in &indicators {
            let Some(zones) = grouped.remove(&indicator.region_id) else {
                continue;
            };
            if let Err(e) = store.update_zoning_data(&indicator.region_id, zones) {
                errors.push(format!("{}: {e}", indicator.region_id));
            }
        }

        StageOutput::from_ingestion(records, errors, warnings)
    }

    /// Stage 4: recompute every region's data quality.
    fn validate_data(&self, store: &mut RegionStore) -> StageOutput {
        let now = Utc::now();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut records = 0usize;

        let assessments: Vec<_> = store
            .iter()
            .map(|region| {
                (
                    region.region_id.clone(),
                    assess_region(region, &self.config.validation, now),
                )
            })
            .collect();

        for (id, quality) in assessments {
            if !quality.is_valid {
                warnings.push(format!(
                    "{id} failed validation (quality {:.0}): {}",
                    quality.score,
                    quality.issues.join("; ")
                ));
            }
            let patch = RegionPatch {
                data_quality: Some(quality),
                ..RegionPatch::default()
            };
            match store.set(&id, patch) {
                Ok(()) => records = records.saturating_add(1),
                Err(e) => errors.push(format!("{id}: {e}")),
            }
        }

        StageOutput {
            success: errors.is_empty(),
            records_processed: records,
            errors,
            warnings,
        }
    }

    /// Stage 5: score every region whose facts passed validation.
    fn score_regions(&self, store: &mut RegionStore) -> StageOutput {
        let current_year = Utc::now().year();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut records = 0usize;

        let candidates: Vec<_> = store
            .iter()
            .map(|region| {
                (
                    region.region_id.clone(),
                    region.hazard_data.clone(),
                    region.zoning_data.clone(),
                    region.data_quality.as_ref().is_some_and(|q| q.is_valid),
                )
            })
            .collect();

        for (id, hazard, zoning, is_valid) in candidates {
            if !is_valid {
                warnings.push(format!("{id} skipped: data quality below threshold"));
                continue;
            }
            let score = score_region(&hazard, &zoning, current_year);
            match store.update_risk_score(&id, score) {
                Ok(()) => records = records.saturating_add(1),
                Err(e) => errors.push(format!("{id}: {e}")),
            }
        }

        StageOutput {
            success: errors.is_empty(),
            records_processed: records,
            errors,
            warnings,
        }
    }

    /// Stage 8: trim the event log and drop expired constraints.
    fn cleanup(&self, store: &mut RegionStore) -> StageOutput {
        let trimmed = store.trim_events(self.config.pipeline.event_log_keep);
        let expired = store.remove_expired_constraints(Utc::now());
        StageOutput::ok(trimmed.saturating_add(expired))
    }

    fn summarize(&self, store: &RegionStore, results: &[StageResult]) -> RunSummary {
        let regions_analyzed = results
            .iter()
            .find(|r| r.stage == PipelineStage::RiskScoring)
            .map_or(0, |r| r.records_processed);
        let top_regions = store
            .get_rankings(Some(self.config.pipeline.top_rankings))
            .into_iter()
            .map(|entry| entry.region_name)
            .collect();

        RunSummary {
            stages_completed: results.iter().filter(|r| r.success).count(),
            stages_total: results.len(),
            total_records: results
                .iter()
                .fold(0usize, |acc, r| acc.saturating_add(r.records_processed)),
            error_count: results
                .iter()
                .fold(0usize, |acc, r| acc.saturating_add(r.errors.len())),
            warning_count: results
                .iter()
                .fold(0usize, |acc, r| acc.saturating_add(r.warnings.len())),
            regions_analyzed,
            top_regions,
        }
    }
}

/// Stage 6: build and append a report for every scored region.
fn generate_reports(store: &mut RegionStore) -> StageOutput {
    let mut errors = Vec::new();
    let mut records = 0usize;

    let scored: Vec<_> = store
        .iter()
        .filter(|region| region.risk_score.is_some())
        .cloned()
        .collect();

    for region in scored {
        match report_for_region(&region) {
            Ok(report) => match store.append_report(&region.region_id, report) {
                Ok(()) => records = records.saturating_add(1),
                Err(e) => errors.push(format!("{}: {e}", region.region_id)),
            },
            Err(e) => errors.push(format!("{}: {e}", region.region_id)),
        }
    }

    StageOutput {
        success: errors.is_empty(),
        records_processed: records,
        errors,
        warnings: Vec::new(),
    }
}

/// Stage 7: emit the run-completion event.
fn sync_state(store: &mut RegionStore) -> StageOutput {
    let detail = format!(
        "pipeline run complete: {} regions at store version {}",
        store.region_count(),
        store.version()
    );
    store.emit_event(EventKind::PipelineCompleted, None, detail);
    StageOutput::ok(store.region_count())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wildrisk_types::{
        DevelopmentStatus, FireRecord, RegionType, YearlyStat, Zone, ZoneCategory,
    };

    use super::*;
    use crate::config::TrackedRegion;

    fn make_zone(id: &str, municipality: &str, area_ha: f64) -> Zone {
        Zone {
            zone_id: id.to_owned(),
            municipality: municipality.to_owned(),
            category: ZoneCategory::Residential,
            status: DevelopmentStatus::Developed,
            area_ha,
        }
    }

    fn seeded_runner() -> PipelineRunner {
        let mut config = AnalysisConfig::default();
        config.regions.tracked = vec![
            TrackedRegion::municipality("Kelowna"),
            TrackedRegion::municipality("Kamloops"),
        ];

        let hazard = FixtureHazardSource::new()
            .with_region(
                "Kelowna",
                vec![
                    FireRecord {
                        fire_number: String::from("K52125"),
                        year: 2024,
                        size_ha: 1_500.0,
                        cause: Some(String::from("Lightning")),
                    },
                    FireRecord {
                        fire_number: String::from("K50311"),
                        year: 2022,
                        size_ha: 300.0,
                        cause: None,
                    },
                ],
                vec![YearlyStat {
                    year: 2024,
                    total_cost: 6_000_000.0,
                    structures_destroyed: 12,
                    fire_count: 9,
                    hectares_burned: 4_200.0,
                }],
            )
            .with_region(
                "Kamloops",
                vec![FireRecord {
                    fire_number: String::from("K61002"),
                    year: 2023,
                    size_ha: 800.0,
                    cause: None,
                }],
                vec![YearlyStat {
                    year: 2023,
                    total_cost: 2_500_000.0,
                    structures_destroyed: 3,
                    fire_count: 5,
                    hectares_burned: 1_100.0,
                }],
            );

        let zoning = FixtureZoningSource::new()
            .with_municipality(
                "Kelowna",
                vec![
                    make_zone("KZ-1", "Kelowna", 120.0),
                    make_zone("KZ-2", "Kelowna", 80.0),
                ],
            )
            .with_municipality("Kamloops", vec![make_zone("MZ-1", "Kamloops", 200.0)]);

        PipelineRunner::new(
            config,
            HazardSource::Fixture(hazard),
            ZoningSource::Fixture(zoning),
        )
    }

    #[tokio::test]
    async fn full_offline_run_scores_and_reports_every_region() {
        let runner = seeded_runner();
        let mut store = RegionStore::new();

        let run = runner.run(&mut store).await;

        assert!(run.success);
        assert_eq!(run.stage_results.len(), 8);
        let order: Vec<PipelineStage> = run.stage_results.iter().map(|r| r.stage).collect();
        assert_eq!(order, PipelineStage::ALL.to_vec());

        assert_eq!(run.summary.stages_completed, 8);
        assert_eq!(run.summary.regions_analyzed, 2);
        assert_eq!(run.summary.top_regions.len(), 2);

        for name in ["Kelowna", "Kamloops"] {
            let region = store.get(&RegionId::new(name)).unwrap();
            assert!(region.risk_score.is_some());
            assert_eq!(region.reports.len(), 1);
            assert!(region.data_quality.as_ref().unwrap().is_valid);
        }
        assert_eq!(store.get_rankings(None).len(), 2);
    }

    #[tokio::test]
    async fn regions_without_usable_facts_are_validated_but_not_scored() {
        let mut config = AnalysisConfig::default();
        config.regions.tracked = vec![
            TrackedRegion::municipality("Kelowna"),
            TrackedRegion::municipality("Ghost Town"),
        ];

        let hazard = FixtureHazardSource::new().with_region(
            "Kelowna",
            vec![FireRecord {
                fire_number: String::from("K1"),
                year: 2024,
                size_ha: 2_000.0,
                cause: None,
            }],
            vec![YearlyStat {
                year: 2024,
                total_cost: 4_000_000.0,
                structures_destroyed: 5,
                fire_count: 6,
                hectares_burned: 3_000.0,
            }],
        );
        let zoning = FixtureZoningSource::new()
            .with_municipality("Kelowna", vec![make_zone("KZ-1", "Kelowna", 50.0)]);

        let runner = PipelineRunner::new(
            config,
            HazardSource::Fixture(hazard),
            ZoningSource::Fixture(zoning),
        );
        let mut store = RegionStore::new();
        let run = runner.run(&mut store).await;

        // Ghost Town has no fires, statistics, or zones: quality 35 < 50.
        let ghost = store.get(&RegionId::new("Ghost Town")).unwrap();
        assert!(ghost.data_quality.is_some());
        assert!(!ghost.data_quality.as_ref().unwrap().is_valid);
        assert!(ghost.risk_score.is_none());

        let kelowna = store.get(&RegionId::new("Kelowna")).unwrap();
        assert!(kelowna.risk_score.is_some());

        assert_eq!(run.summary.regions_analyzed, 1);
        assert_eq!(store.get_rankings(None).len(), 1);
        // The skipped region shows up as a scoring warning, not an error.
        let scoring = run
            .stage_results
            .iter()
            .find(|r| r.stage == PipelineStage::RiskScoring)
            .unwrap();
        assert!(scoring.success);
        assert!(scoring.warnings.iter().any(|w| w.contains("ghost-town")));
    }

    #[tokio::test]
    async fn state_sync_emits_completion_event_and_cleanup_trims() {
        let runner = seeded_runner();
        let mut store = RegionStore::new();
        runner.run(&mut store).await;

        assert!(
            store
                .events()
                .any(|e| e.kind == EventKind::PipelineCompleted)
        );
        // Default keep is 500; this run emits far fewer, so nothing trims.
        let cleanup_keep = runner.config.pipeline.event_log_keep;
        assert!(store.events().count() <= cleanup_keep);
    }

    #[tokio::test]
    async fn second_run_replaces_scores_and_appends_reports() {
        let runner = seeded_runner();
        let mut store = RegionStore::new();
        runner.run(&mut store).await;
        runner.run(&mut store).await;

        let region = store.get(&RegionId::new("Kelowna")).unwrap();
        // Reports accumulate; the score is replaced in place.
        assert_eq!(region.reports.len(), 2);
        assert!(region.risk_score.is_some());
        assert_eq!(store.get_rankings(None).len(), 2);
    }
}
