//! Zoning feed collaborators and development-indicator derivation.
//!
//! Zone records arrive keyed by municipality name. Indicators derived
//! from them are keyed by the municipality's normalized slug; the feed's
//! own `zone_id` is never used as a region key.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info};
use wildrisk_types::{DevelopmentStatus, RegionId, Zone, ZoneCategory};

use crate::client::WfsClient;
use crate::error::IngestError;
use crate::validation::IngestValidation;

/// The result of a zoning fetch for one municipality.
#[derive(Debug)]
pub struct ZoningFetch {
    /// Parsed zone records.
    pub zones: Vec<Zone>,
    /// What was dropped or complained about along the way.
    pub validation: IngestValidation,
}

/// A source of zoning facts for a municipality.
pub enum ZoningSource {
    /// WFS-style HTTP feed.
    Http(HttpZoningSource),
    /// In-memory fixture records.
    Fixture(FixtureZoningSource),
}

impl ZoningSource {
    /// Fetch zone records for a municipality by display name.
    pub async fn fetch(&self, municipality: &str) -> Result<ZoningFetch, IngestError> {
        match self {
            Self::Http(source) => source.fetch(municipality).await,
            Self::Fixture(source) => Ok(source.fetch(municipality)),
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

/// Zoning source backed by a WFS feature feed.
pub struct HttpZoningSource {
    client: WfsClient,
    zoning_url: String,
}

impl HttpZoningSource {
    /// Create an HTTP zoning source against the given endpoint.
    pub const fn new(client: WfsClient, zoning_url: String) -> Self {
        Self { client, zoning_url }
    }

    async fn fetch(&self, municipality: &str) -> Result<ZoningFetch, IngestError> {
        let mut validation = IngestValidation::default();

        let query = vec![
            (String::from("service"), String::from("WFS")),
            (String::from("version"), String::from("2.0.0")),
            (String::from("request"), String::from("GetFeature")),
            (String::from("outputFormat"), String::from("application/json")),
            (
                String::from("CQL_FILTER"),
                format!("MUNICIPALITY ILIKE '%{municipality}%'"),
            ),
        ];

        let fetch = self.client.fetch_features(&self.zoning_url, &query).await?;
        validation.warnings.extend(fetch.warnings);

        let mut zones = Vec::with_capacity(fetch.features.len());
        for (index, feature) in fetch.features.iter().enumerate() {
            match parse_zone_feature(feature) {
                Ok(zone) => {
                    zones.push(zone);
                    validation.keep();
                }
                Err(reason) => {
                    validation.drop_record(format!("zone feature {index}: {reason}"));
                }
            }
        }

        if zones.is_empty() && !validation.is_clean() {
            return Err(IngestError::Validation(format!(
                "zoning feed for {municipality} yielded no usable records"
            )));
        }

        info!(
            municipality = municipality,
            zones = zones.len(),
            dropped = validation.records_dropped,
            "zoning facts fetched"
        );

        Ok(ZoningFetch { zones, validation })
    }
}

/// Parse one WFS zoning feature into a [`Zone`].
fn parse_zone_feature(feature: &Value) -> Result<Zone, String> {
    let properties = feature
        .get("properties")
        .ok_or_else(|| String::from("missing properties"))?;

    let zone_id = properties
        .get("ZONE_ID")
        .and_then(Value::as_str)
        .ok_or_else(|| String::from("missing ZONE_ID"))?
        .to_owned();
    let municipality = properties
        .get("MUNICIPALITY")
        .and_then(Value::as_str)
        .ok_or_else(|| String::from("missing MUNICIPALITY"))?
        .to_owned();
    let raw_category = properties
        .get("ZONE_CATEGORY")
        .and_then(Value::as_str)
        .ok_or_else(|| String::from("missing ZONE_CATEGORY"))?;
    let raw_status = properties
        .get("DEVELOPMENT_STATUS")
        .and_then(Value::as_str)
        .ok_or_else(|| String::from("missing DEVELOPMENT_STATUS"))?;
    let area_ha = properties
        .get("AREA_HA")
        .and_then(Value::as_f64)
        .ok_or_else(|| String::from("missing AREA_HA"))?;

    if area_ha < 0.0 {
        return Err(format!("negative area {area_ha}"));
    }

    Ok(Zone {
        zone_id,
        municipality,
        category: parse_category(raw_category)
            .ok_or_else(|| format!("unrecognized category '{raw_category}'"))?,
        status: parse_status(raw_status)
            .ok_or_else(|| format!("unrecognized status '{raw_status}'"))?,
        area_ha,
    })
}

/// Map a feed category string onto a [`ZoneCategory`].
///
/// Feeds are inconsistent about casing and phrasing ("Mixed Use",
/// "mixed_use", "MIXED-USE"); matching is by lowercase substring.
fn parse_category(raw: &str) -> Option<ZoneCategory> {
    let lower = raw.to_lowercase();
    if lower.contains("resid") {
        Some(ZoneCategory::Residential)
    } else if lower.contains("commerc") {
        Some(ZoneCategory::Commercial)
    } else if lower.contains("indust") {
        Some(ZoneCategory::Industrial)
    } else if lower.contains("mixed") {
        Some(ZoneCategory::MixedUse)
    } else if lower.contains("agric") || lower.contains("farm") {
        Some(ZoneCategory::Agricultural)
    } else if lower.contains("park") || lower.contains("recreat") {
        Some(ZoneCategory::Parkland)
    } else if lower.contains("rural") {
        Some(ZoneCategory::Rural)
    } else {
        None
    }
}

/// Map a feed development-status string onto a [`DevelopmentStatus`].
fn parse_status(raw: &str) -> Option<DevelopmentStatus> {
    let lower = raw.to_lowercase();
    if lower.contains("under") || lower.contains("vacant") || lower.contains("undevel") {
        Some(DevelopmentStatus::Underdeveloped)
    } else if lower.contains("devel") || lower.contains("built") {
        Some(DevelopmentStatus::Developed)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Fixture feed
// ---------------------------------------------------------------------------

/// Zoning source serving canned records, keyed by municipality slug.
#[derive(Debug, Default)]
pub struct FixtureZoningSource {
    zones: BTreeMap<RegionId, Vec<Zone>>,
}

impl FixtureZoningSource {
    /// Create an empty fixture source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register fixture zone records for a municipality.
    pub fn with_municipality(mut self, municipality: &str, zones: Vec<Zone>) -> Self {
        self.zones.insert(RegionId::new(municipality), zones);
        self
    }

    fn fetch(&self, municipality: &str) -> ZoningFetch {
        let id = RegionId::new(municipality);
        let zones = self.zones.get(&id).cloned().unwrap_or_default();

        let mut validation = IngestValidation::default();
        validation.records_kept = zones.len();
        if zones.is_empty() {
            validation
                .warnings
                .push(format!("no fixture zone records for {id}"));
        }
        debug!(municipality = municipality, zones = zones.len(), "fixture zoning fetch");

        ZoningFetch { zones, validation }
    }
}

// ---------------------------------------------------------------------------
// Development indicators
// ---------------------------------------------------------------------------

/// Derived development facts for one municipality.
#[derive(Debug, Clone, PartialEq)]
pub struct DevelopmentIndicators {
    /// Region key: the municipality name as a normalized slug.
    pub region_id: RegionId,
    /// Municipality display name as spelled by the feed.
    pub municipality: String,
    /// Zone records contributing to the indicators.
    pub zone_count: usize,
    /// Total zoned area in hectares.
    pub total_area_ha: f64,
    /// Share of zoned area that is developed, 0-100.
    pub developed_percentage: f64,
    /// Share of zoned area that is underdeveloped, 0-100.
    pub underdeveloped_percentage: f64,
}

/// Derive per-municipality development indicators from a zone list.
///
/// Zones are grouped by the slug of their `municipality` field. The
/// output `region_id` is always that slug, never the feed's `zone_id`.
pub fn calculate_development_indicators(zones: &[Zone]) -> Vec<DevelopmentIndicators> {
    let mut by_municipality: BTreeMap<RegionId, Vec<&Zone>> = BTreeMap::new();
    for zone in zones {
        by_municipality
            .entry(RegionId::new(&zone.municipality))
            .or_default()
            .push(zone);
    }

    by_municipality
        .into_iter()
        .map(|(region_id, group)| {
            let total_area_ha: f64 = group.iter().map(|z| z.area_ha.max(0.0)).sum();
            let developed_area: f64 = group
                .iter()
                .filter(|z| z.status == DevelopmentStatus::Developed)
                .map(|z| z.area_ha.max(0.0))
                .sum();
            let underdeveloped_area: f64 = group
                .iter()
                .filter(|z| z.status == DevelopmentStatus::Underdeveloped)
                .map(|z| z.area_ha.max(0.0))
                .sum();

            let (developed_percentage, underdeveloped_percentage) = if total_area_ha > 0.0 {
                (
                    developed_area / total_area_ha * 100.0,
                    underdeveloped_area / total_area_ha * 100.0,
                )
            } else {
                (0.0, 0.0)
            };

            let municipality = group
                .first()
                .map(|z| z.municipality.clone())
                .unwrap_or_default();

            DevelopmentIndicators {
                region_id,
                municipality,
                zone_count: group.len(),
                total_area_ha,
                developed_percentage,
                underdeveloped_percentage,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn zone(
        zone_id: &str,
        municipality: &str,
        status: DevelopmentStatus,
        area_ha: f64,
    ) -> Zone {
        Zone {
            zone_id: zone_id.to_owned(),
            municipality: municipality.to_owned(),
            category: ZoneCategory::Residential,
            status,
            area_ha,
        }
    }

    fn zone_feature(zone_id: &str, category: &str, status: &str) -> Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "ZONE_ID": zone_id,
                "MUNICIPALITY": "Fort St. John",
                "ZONE_CATEGORY": category,
                "DEVELOPMENT_STATUS": status,
                "AREA_HA": 12.5
            }
        })
    }

    #[test]
    fn parses_well_formed_zone_features() {
        let zone = parse_zone_feature(&zone_feature("Z-100", "Residential", "Developed")).unwrap();
        assert_eq!(zone.zone_id, "Z-100");
        assert_eq!(zone.municipality, "Fort St. John");
        assert_eq!(zone.category, ZoneCategory::Residential);
        assert_eq!(zone.status, DevelopmentStatus::Developed);
    }

    #[test]
    fn category_matching_tolerates_feed_spellings() {
        assert_eq!(parse_category("MIXED-USE"), Some(ZoneCategory::MixedUse));
        assert_eq!(parse_category("Agricultural Land Reserve"), Some(ZoneCategory::Agricultural));
        assert_eq!(parse_category("Park / Recreation"), Some(ZoneCategory::Parkland));
        assert_eq!(parse_category("Spaceport"), None);
    }

    #[test]
    fn status_matching_tolerates_feed_spellings() {
        assert_eq!(parse_status("VACANT"), Some(DevelopmentStatus::Underdeveloped));
        assert_eq!(parse_status("Built-out"), Some(DevelopmentStatus::Developed));
        assert_eq!(parse_status("unknown"), None);
    }

    #[test]
    fn garbled_zone_features_are_rejected_with_reason() {
        let result = parse_zone_feature(&zone_feature("Z-1", "Spaceport", "Developed"));
        assert!(result.unwrap_err().contains("unrecognized category"));
    }

    #[test]
    fn indicators_key_by_municipality_slug_not_zone_id() {
        let zones = vec![
            zone("Z-900", "Fort St. John", DevelopmentStatus::Developed, 60.0),
            zone("Z-901", "Fort St. John", DevelopmentStatus::Underdeveloped, 40.0),
        ];
        let indicators = calculate_development_indicators(&zones);
        assert_eq!(indicators.len(), 1);

        let first = indicators.first().unwrap();
        assert_eq!(first.region_id.as_str(), "fort-st-john");
        assert_ne!(first.region_id.as_str(), "z-900");
        assert_eq!(first.zone_count, 2);
        assert!((first.developed_percentage - 60.0).abs() < f64::EPSILON);
        assert!((first.underdeveloped_percentage - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn indicators_group_multiple_municipalities() {
        let zones = vec![
            zone("A-1", "Kelowna", DevelopmentStatus::Developed, 10.0),
            zone("B-1", "Vernon", DevelopmentStatus::Developed, 20.0),
            zone("A-2", "kelowna", DevelopmentStatus::Underdeveloped, 10.0),
        ];
        let indicators = calculate_development_indicators(&zones);
        assert_eq!(indicators.len(), 2);

        let kelowna = indicators
            .iter()
            .find(|i| i.region_id.as_str() == "kelowna")
            .unwrap();
        // "Kelowna" and "kelowna" normalize to the same slug.
        assert_eq!(kelowna.zone_count, 2);
        assert!((kelowna.developed_percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_area_group_has_zero_percentages() {
        let zones = vec![zone("Z-1", "Empty", DevelopmentStatus::Developed, 0.0)];
        let indicators = calculate_development_indicators(&zones);
        let first = indicators.first().unwrap();
        assert!((first.developed_percentage - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn fixture_source_serves_registered_municipalities() {
        let source = ZoningSource::Fixture(FixtureZoningSource::new().with_municipality(
            "Kelowna",
            vec![zone("Z-1", "Kelowna", DevelopmentStatus::Developed, 5.0)],
        ));
        let fetch = source.fetch("Kelowna").await.unwrap();
        assert_eq!(fetch.zones.len(), 1);
        assert_eq!(source.name(), "fixture");
    }
}
