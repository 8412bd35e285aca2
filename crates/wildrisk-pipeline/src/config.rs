//! Configuration loading and typed config structures for the analysis
//! pipeline.
//!
//! The canonical configuration lives in `wildrisk-config.yaml` at the
//! project root. Every field has a default so an empty file (or no file
//! at all) yields a working offline configuration.

use std::path::Path;

use serde::Deserialize;
use wildrisk_types::RegionType;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level analysis configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Tracked regions.
    #[serde(default)]
    pub regions: RegionsConfig,

    /// Data-quality validation thresholds.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Pipeline run parameters.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Feed endpoints and fetch behavior.
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl AnalysisConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for feed URLs:
    /// - `WILDRISK_PERIMETER_URL` overrides `ingest.perimeter_url`
    /// - `WILDRISK_STATISTICS_URL` overrides `ingest.statistics_url`
    /// - `WILDRISK_ZONING_URL` overrides `ingest.zoning_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.ingest.apply_env_overrides();
        Ok(config)
    }
}

/// Tracked-region configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionsConfig {
    /// Regions the pipeline refreshes and scores on every run.
    #[serde(default = "default_tracked_regions")]
    pub tracked: Vec<TrackedRegion>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            tracked: default_tracked_regions(),
        }
    }
}

/// One tracked region entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackedRegion {
    /// Display name, as spelled in the feeds.
    pub name: String,

    /// Administrative kind.
    #[serde(default = "default_region_type")]
    pub region_type: RegionType,
}

impl TrackedRegion {
    /// A municipality entry by name.
    pub fn municipality(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            region_type: RegionType::Municipality,
        }
    }
}

/// Data-quality validation thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationConfig {
    /// Hours after which hazard facts count as stale.
    #[serde(default = "default_staleness_hours")]
    pub staleness_hours: u64,

    /// Quality score below which a region is not scored.
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            staleness_hours: default_staleness_hours(),
            min_quality_score: default_min_quality_score(),
        }
    }
}

/// Pipeline run parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// How many top-ranked region names the run summary carries.
    #[serde(default = "default_top_rankings")]
    pub top_rankings: usize,

    /// How many events the cleanup stage keeps in the live log.
    #[serde(default = "default_event_log_keep")]
    pub event_log_keep: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_rankings: default_top_rankings(),
            event_log_keep: default_event_log_keep(),
        }
    }
}

/// Which kind of feed sources the pipeline builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestMode {
    /// WFS-style HTTP feeds at the configured URLs.
    Http,
    /// In-memory fixture sources (offline/demo mode).
    Fixture,
}

/// Feed endpoints and fetch behavior.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestConfig {
    /// Source mode.
    #[serde(default = "default_ingest_mode")]
    pub mode: IngestMode,

    /// Fire-perimeter WFS endpoint.
    #[serde(default = "default_perimeter_url")]
    pub perimeter_url: String,

    /// Yearly-statistics endpoint.
    #[serde(default = "default_statistics_url")]
    pub statistics_url: String,

    /// Zoning WFS endpoint.
    #[serde(default = "default_zoning_url")]
    pub zoning_url: String,

    /// Per-attempt request deadline in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl IngestConfig {
    /// Apply environment-variable overrides for feed URLs.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WILDRISK_PERIMETER_URL") {
            self.perimeter_url = url;
        }
        if let Ok(url) = std::env::var("WILDRISK_STATISTICS_URL") {
            self.statistics_url = url;
        }
        if let Ok(url) = std::env::var("WILDRISK_ZONING_URL") {
            self.zoning_url = url;
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: default_ingest_mode(),
            perimeter_url: default_perimeter_url(),
            statistics_url: default_statistics_url(),
            zoning_url: default_zoning_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_tracked_regions() -> Vec<TrackedRegion> {
    ["Kelowna", "Kamloops", "Prince George", "Vernon", "Nanaimo"]
        .iter()
        .map(|name| TrackedRegion::municipality(name))
        .collect()
}

const fn default_region_type() -> RegionType {
    RegionType::Municipality
}

const fn default_staleness_hours() -> u64 {
    168
}

const fn default_min_quality_score() -> f64 {
    50.0
}

const fn default_top_rankings() -> usize {
    5
}

const fn default_event_log_keep() -> usize {
    500
}

const fn default_ingest_mode() -> IngestMode {
    IngestMode::Fixture
}

fn default_perimeter_url() -> String {
    String::from("https://openmaps.gov.bc.ca/geo/pub/wfs")
}

fn default_statistics_url() -> String {
    String::from("https://wildfiresituation.nrs.gov.bc.ca/api/statistics")
}

fn default_zoning_url() -> String {
    String::from("https://catalogue.data.gov.bc.ca/api/zoning/wfs")
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_full_defaults() {
        let config = AnalysisConfig::parse("{}").unwrap();
        assert_eq!(config.ingest.mode, IngestMode::Fixture);
        assert_eq!(config.validation.staleness_hours, 168);
        assert_eq!(config.pipeline.top_rankings, 5);
        assert!(!config.regions.tracked.is_empty());
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r"
regions:
  tracked:
    - name: Squamish
    - name: Coastal Fire Centre
      region_type: fire_centre
validation:
  min_quality_score: 70.0
";
        let config = AnalysisConfig::parse(yaml).unwrap();
        assert_eq!(config.regions.tracked.len(), 2);
        let second = config.regions.tracked.get(1).unwrap();
        assert_eq!(second.region_type, RegionType::FireCentre);
        assert!((config.validation.min_quality_score - 70.0).abs() < f64::EPSILON);
        // Untouched sections keep defaults.
        assert_eq!(config.pipeline.event_log_keep, 500);
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result = AnalysisConfig::parse("regions: [not: valid");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn http_mode_parses() {
        let yaml = r"
ingest:
  mode: http
  perimeter_url: http://localhost:8080/wfs
";
        let config = AnalysisConfig::parse(yaml).unwrap();
        assert_eq!(config.ingest.mode, IngestMode::Http);
        assert_eq!(config.ingest.perimeter_url, "http://localhost:8080/wfs");
    }
}
