//! Hazard feed collaborators: historical fire perimeters and yearly
//! wildfire statistics.
//!
//! `HazardSource` uses enum dispatch instead of trait objects because
//! async methods are not dyn-compatible in Rust. The HTTP variant talks
//! to a WFS-style feed; the fixture variant serves canned records for
//! tests and offline demos.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use wildrisk_types::{FireRecord, HazardData, RegionId, YearlyStat};

use crate::client::WfsClient;
use crate::error::IngestError;
use crate::validation::IngestValidation;

/// The result of a hazard fetch for one region.
#[derive(Debug)]
pub struct HazardFetch {
    /// Parsed fire and statistics facts, stamped with the fetch time.
    pub data: HazardData,
    /// What was dropped or complained about along the way.
    pub validation: IngestValidation,
}

/// A source of hazard facts for a region.
///
/// Enum dispatch keeps the async fetch method dyn-compatible-free.
pub enum HazardSource {
    /// WFS-style HTTP feed.
    Http(HttpHazardSource),
    /// In-memory fixture records.
    Fixture(FixtureHazardSource),
}

impl HazardSource {
    /// Fetch hazard facts for a region by display name.
    pub async fn fetch(&self, region_name: &str) -> Result<HazardFetch, IngestError> {
        match self {
            Self::Http(source) => source.fetch(region_name).await,
            Self::Fixture(source) => Ok(source.fetch(region_name)),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Http(_) => "http-wfs",
            Self::Fixture(_) => "fixture",
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP feed
// ---------------------------------------------------------------------------

/// Hazard source backed by a WFS feature feed and a statistics endpoint.
pub struct HttpHazardSource {
    client: WfsClient,
    perimeter_url: String,
    statistics_url: String,
}

impl HttpHazardSource {
    /// Create an HTTP hazard source against the given endpoints.
    pub const fn new(client: WfsClient, perimeter_url: String, statistics_url: String) -> Self {
        Self {
            client,
            perimeter_url,
            statistics_url,
        }
    }

    async fn fetch(&self, region_name: &str) -> Result<HazardFetch, IngestError> {
        let mut validation = IngestValidation::default();

        let query = vec![
            (String::from("service"), String::from("WFS")),
            (String::from("version"), String::from("2.0.0")),
            (String::from("request"), String::from("GetFeature")),
            (String::from("outputFormat"), String::from("application/json")),
            (
                String::from("CQL_FILTER"),
                format!("FIRE_CENTRE_NAME ILIKE '%{region_name}%'"),
            ),
        ];

        let fetch = self.client.fetch_features(&self.perimeter_url, &query).await?;
        validation.warnings.extend(fetch.warnings);

        let mut fires = Vec::with_capacity(fetch.features.len());
        for (index, feature) in fetch.features.iter().enumerate() {
            match parse_fire_feature(feature) {
                Some(record) => {
                    fires.push(record);
                    validation.keep();
                }
                None => validation
                    .drop_record(format!("perimeter feature {index} is missing required fields")),
            }
        }

        let statistics = self.fetch_statistics(region_name, &mut validation).await?;

        if fires.is_empty() && statistics.is_empty() && !validation.is_clean() {
            return Err(IngestError::Validation(format!(
                "hazard feed for {region_name} yielded no usable records"
            )));
        }

        info!(
            region = region_name,
            fires = fires.len(),
            statistics = statistics.len(),
            dropped = validation.records_dropped,
            "hazard facts fetched"
        );

        Ok(HazardFetch {
            data: HazardData {
                fires,
                statistics,
                last_updated: Some(Utc::now()),
            },
            validation,
        })
    }

    async fn fetch_statistics(
        &self,
        region_name: &str,
        validation: &mut IngestValidation,
    ) -> Result<Vec<YearlyStat>, IngestError> {
        let query = vec![(String::from("region"), region_name.to_owned())];
        let (body, warnings) = self.client.get_json(&self.statistics_url, &query).await?;
        validation.warnings.extend(warnings);

        let entries = body
            .as_array()
            .cloned()
            .ok_or_else(|| IngestError::Parse(String::from("statistics body is not an array")))?;

        let mut statistics = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<YearlyStat>(entry) {
                Ok(stat) => {
                    statistics.push(stat);
                    validation.keep();
                }
                Err(e) => {
                    validation.drop_record(format!("statistics entry {index} is garbled: {e}"));
                }
            }
        }
        Ok(statistics)
    }
}

/// Parse one WFS perimeter feature into a [`FireRecord`].
///
/// Returns `None` when a required property is missing or mistyped; the
/// caller counts the drop.
fn parse_fire_feature(feature: &Value) -> Option<FireRecord> {
    let properties = feature.get("properties")?;
    let fire_number = properties.get("FIRE_NUMBER")?.as_str()?.to_owned();
    let year = i32::try_from(properties.get("FIRE_YEAR")?.as_i64()?).ok()?;
    let size_ha = properties.get("FIRE_SIZE_HECTARES")?.as_f64()?;
    let cause = properties
        .get("FIRE_CAUSE")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);

    if size_ha < 0.0 {
        return None;
    }

    Some(FireRecord {
        fire_number,
        year,
        size_ha,
        cause,
    })
}

// ---------------------------------------------------------------------------
// Fixture feed
// ---------------------------------------------------------------------------

/// Hazard source serving canned records, keyed by region slug.
#[derive(Debug, Default)]
pub struct FixtureHazardSource {
    fires: BTreeMap<RegionId, Vec<FireRecord>>,
    statistics: BTreeMap<RegionId, Vec<YearlyStat>>,
}

impl FixtureHazardSource {
    /// Create an empty fixture source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register fixture records for a region.
    pub fn with_region(
        mut self,
        region_name: &str,
        fires: Vec<FireRecord>,
        statistics: Vec<YearlyStat>,
    ) -> Self {
        let id = RegionId::new(region_name);
        self.fires.insert(id.clone(), fires);
        self.statistics.insert(id, statistics);
        self
    }

    fn fetch(&self, region_name: &str) -> HazardFetch {
        let id = RegionId::new(region_name);
        let fires = self.fires.get(&id).cloned().unwrap_or_default();
        let statistics = self.statistics.get(&id).cloned().unwrap_or_default();

        let mut validation = IngestValidation::default();
        validation.records_kept = fires.len().saturating_add(statistics.len());
        if fires.is_empty() && statistics.is_empty() {
            validation
                .warnings
                .push(format!("no fixture hazard records for {id}"));
        }
        debug!(region = region_name, fires = fires.len(), "fixture hazard fetch");

        HazardFetch {
            data: HazardData {
                fires,
                statistics,
                last_updated: Some(Utc::now()),
            },
            validation,
        }
    }
}
