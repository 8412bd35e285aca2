//! Wildrisk binary: one pipeline run plus a crew analysis.
//!
//! This is the main entry point that wires together the store, the
//! ingestion pipeline, and the agent crew. It loads configuration,
//! refreshes every tracked region, and runs the three-stage crew
//! against the highest-ranked region.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `wildrisk-config.yaml`
//! 3. Load the advisor section and apply env overrides
//! 4. Create the store and subscribe the mutation logger
//! 5. Build the pipeline runner (seeded fixtures in fixture mode)
//! 6. Run the pipeline and log the summary
//! 7. Run the crew against the top-ranked region
//! 8. Log the result

mod error;
mod fixtures;
mod observer;

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wildrisk_crew::{AdvisorConfig, AgentCrew};
use wildrisk_pipeline::{AnalysisConfig, IngestMode, PipelineRunner};
use wildrisk_store::RegionStore;

use crate::error::CliError;
use crate::observer::MutationLogger;

const CONFIG_PATH: &str = "wildrisk-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration loading, runner construction, or
/// the crew run fails. Pipeline stage failures do not error out; they
/// are reported in the run summary.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("wildrisk starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        tracked_regions = config.regions.tracked.len(),
        ingest_mode = ?config.ingest.mode,
        min_quality_score = config.validation.min_quality_score,
        "Configuration loaded"
    );

    // 3. Load advisor configuration.
    let advisor_config = load_advisor_config()?;
    info!(backend = ?advisor_config.backend, "Advisor configuration loaded");

    // 4. Create the store and subscribe the mutation logger.
    let mut store = RegionStore::new();
    store.subscribe(Box::new(MutationLogger));

    // 5. Build the pipeline runner.
    let runner = build_runner(config)?;

    // 6. Run the pipeline.
    let run = runner.run(&mut store).await;
    info!(
        success = run.success,
        stages_completed = run.summary.stages_completed,
        regions_analyzed = run.summary.regions_analyzed,
        total_records = run.summary.total_records,
        errors = run.summary.error_count,
        warnings = run.summary.warning_count,
        "Pipeline run finished"
    );
    for name in &run.summary.top_regions {
        info!(region = %name, "ranked region");
    }

    // 7. Run the crew against the top-ranked region.
    let Some(top) = store.get_rankings(Some(1)).into_iter().next() else {
        warn!("no region was scored, skipping crew analysis");
        return Ok(());
    };
    let crew = AgentCrew::from_config(&advisor_config).map_err(CliError::from)?;
    let crew_run = crew
        .run(&mut store, &top.region_id)
        .await
        .map_err(CliError::from)?;
    for conclusion in &crew_run.conclusions {
        info!(
            agent = conclusion.agent.agent_id(),
            confidence = conclusion.confidence,
            summary = %conclusion.summary,
            "crew conclusion"
        );
    }

    // 8. Log the result.
    info!(
        region = %top.region_id,
        status = ?crew_run.state.status,
        store_version = store.version(),
        "wildrisk shutdown complete"
    );

    Ok(())
}

/// Load the analysis configuration from `wildrisk-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<AnalysisConfig, CliError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(AnalysisConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(AnalysisConfig::default())
    }
}

/// Load the `advisor` section from `wildrisk-config.yaml`.
///
/// If the file does not exist or lacks the `advisor` key, the advisor
/// defaults to disabled. `WILDRISK_ADVISOR_API_KEY` overrides the key
/// in either case.
fn load_advisor_config() -> Result<AdvisorConfig, CliError> {
    let config_path = Path::new(CONFIG_PATH);
    let mut advisor = if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| CliError::AdvisorConfig(format!("failed to read config file: {e}")))?;
        let raw: serde_yml::Value = serde_yml::from_str(&contents)
            .map_err(|e| CliError::AdvisorConfig(format!("failed to parse config YAML: {e}")))?;
        match raw.get("advisor") {
            Some(section) => serde_yml::from_value(section.clone())
                .map_err(|e| CliError::AdvisorConfig(format!("failed to parse advisor config: {e}")))?,
            None => AdvisorConfig::default(),
        }
    } else {
        AdvisorConfig::default()
    };
    advisor.apply_env_overrides();
    Ok(advisor)
}

/// Build the pipeline runner for the configured ingest mode.
///
/// Fixture mode gets canned feed data so an offline run still exercises
/// every stage; HTTP mode talks to the configured WFS endpoints.
fn build_runner(config: AnalysisConfig) -> Result<PipelineRunner, CliError> {
    match config.ingest.mode {
        IngestMode::Fixture => {
            let (hazard, zoning) = fixtures::seeded_sources();
            Ok(PipelineRunner::new(config, hazard, zoning))
        }
        IngestMode::Http => Ok(PipelineRunner::from_config(config)?),
    }
}
