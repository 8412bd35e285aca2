//! The region-state store: the only mutable state in the system.
//!
//! [`RegionStore`] owns one [`Region`] record per tracked region plus the
//! global event log, the constraint list, and the derived ranking table.
//! All mutation funnels through the writer methods here, which is the
//! system's sole synchronization boundary -- callers never mutate a
//! fetched copy and expect it to propagate.
//!
//! Records are created lazily on first write with zeroed defaults and are
//! never deleted except by [`RegionStore::reset`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wildrisk_types::{
    AgentConclusion, Constraint, DataQuality, EventKind, FireRecord, HazardData, RankingEntry,
    Region, RegionId, RegionType, RiskReport, RiskScore, StoreEvent, YearlyStat, Zone, ZoningData,
};

use crate::error::StoreError;
use crate::events::EventLog;
use crate::snapshot::{SerializedStore, StoreSnapshot};

/// Callback invoked for every event the store emits.
///
/// Implementations can use this to mirror mutations to a dashboard,
/// broadcast over a channel, etc.
pub trait StoreObserver: Send {
    /// Called after an event has been recorded in the log.
    fn on_event(&mut self, event: &StoreEvent);
}

/// A no-op observer for testing.
pub struct NoOpObserver;

impl StoreObserver for NoOpObserver {
    fn on_event(&mut self, _event: &StoreEvent) {}
}

/// A partial region update merged by [`RegionStore::set`].
///
/// Merge semantics are shallow-replace per top-level field: a `Some`
/// field replaces the record's field wholesale, a `None` field leaves it
/// untouched. Callers must therefore supply complete sub-objects (a full
/// [`HazardData`], never a delta).
#[derive(Debug, Clone, Default)]
pub struct RegionPatch {
    /// Replacement display name.
    pub region_name: Option<String>,
    /// Replacement region type.
    pub region_type: Option<RegionType>,
    /// Replacement hazard facts (complete object).
    pub hazard_data: Option<HazardData>,
    /// Replacement zoning facts (complete object).
    pub zoning_data: Option<ZoningData>,
    /// Replacement validation result.
    pub data_quality: Option<DataQuality>,
}

/// Aggregate counts returned alongside a region listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCounts {
    /// Number of regions in the listing. Always equals the length of the
    /// returned region vector, for every filter value.
    pub total: usize,
    /// Listing breakdown by region type.
    pub by_type: BTreeMap<RegionType, usize>,
}

/// Result of a region listing query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionList {
    /// The matching regions.
    pub regions: Vec<Region>,
    /// Counts computed from the same filtered set.
    pub counts: RegionCounts,
}

/// The shared region-state store.
pub struct RegionStore {
    regions: BTreeMap<RegionId, Region>,
    version: u64,
    events: EventLog,
    constraints: Vec<Constraint>,
    rankings: Vec<RankingEntry>,
    observers: Vec<Box<dyn StoreObserver>>,
}

impl core::fmt::Debug for RegionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegionStore")
            .field("regions", &self.regions.len())
            .field("version", &self.version)
            .field("events", &self.events.len())
            .field("constraints", &self.constraints.len())
            .field("rankings", &self.rankings.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for RegionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
            version: 0,
            events: EventLog::new(),
            constraints: Vec::new(),
            rankings: Vec::new(),
            observers: Vec::new(),
        }
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Get an immutable reference to a region record.
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// All region records, cloned, in id order.
    pub fn get_all(&self) -> Vec<Region> {
        self.regions.values().cloned().collect()
    }

    /// Iterate over region records without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of tracked regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Monotonically increasing store version.
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// List regions, optionally filtered by type.
    ///
    /// The returned counts are computed from the same filtered set, so
    /// `counts.total` always equals `regions.len()` regardless of filter.
    pub fn list_regions(&self, filter: Option<RegionType>) -> RegionList {
        let regions: Vec<Region> = self
            .regions
            .values()
            .filter(|r| filter.is_none_or(|t| r.region_type == t))
            .cloned()
            .collect();

        let mut by_type: BTreeMap<RegionType, usize> = BTreeMap::new();
        for region in &regions {
            let count = by_type.entry(region.region_type).or_insert(0);
            *count = count.saturating_add(1);
        }

        let counts = RegionCounts {
            total: regions.len(),
            by_type,
        };
        RegionList { regions, counts }
    }

    /// The global ranking table, best (rank 1) first, optionally limited.
    pub fn get_rankings(&self, limit: Option<usize>) -> Vec<RankingEntry> {
        let take = limit.unwrap_or(self.rankings.len());
        self.rankings.iter().take(take).cloned().collect()
    }

    /// Constraints whose validity window contains `now`.
    pub fn active_constraints(&self, now: DateTime<Utc>) -> Vec<Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.is_active(now))
            .cloned()
            .collect()
    }

    /// Iterate over the live event log, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &StoreEvent> {
        self.events.iter()
    }

    /// The most recent events, oldest first.
    pub fn recent_events(&self) -> Vec<StoreEvent> {
        self.events.recent().cloned().collect()
    }

    // -------------------------------------------------------------------
    // Writers
    // -------------------------------------------------------------------

    /// Merge a partial update into a region record.
    ///
    /// Creates a default record first if the region is unknown (display
    /// name falls back to the slug, type to municipality). Each `Some`
    /// field of the patch replaces the record's field wholesale. Bumps the
    /// store version, stamps `last_modified`, emits a
    /// [`EventKind::StateUpdated`] event, and notifies observers.
    pub fn set(&mut self, id: &RegionId, patch: RegionPatch) -> Result<(), StoreError> {
        if id.is_empty() {
            return Err(StoreError::EmptyRegionId {
                raw: id.to_string(),
            });
        }

        if !self.regions.contains_key(id) {
            let name = patch
                .region_name
                .clone()
                .unwrap_or_else(|| id.as_str().to_owned());
            let region_type = patch.region_type.unwrap_or(RegionType::Municipality);
            self.regions
                .insert(id.clone(), Region::with_defaults(id.clone(), name, region_type));
            debug!(region = %id, "region record created");
            self.record_event(
                EventKind::RegionCreated,
                Some(id.clone()),
                format!("region {id} created with defaults"),
            );
        }

        if let Some(region) = self.regions.get_mut(id) {
            if let Some(name) = patch.region_name {
                region.region_name = name;
            }
            if let Some(region_type) = patch.region_type {
                region.region_type = region_type;
            }
            if let Some(hazard) = patch.hazard_data {
                region.hazard_data = hazard;
            }
            if let Some(zoning) = patch.zoning_data {
                region.zoning_data = zoning;
            }
            if let Some(quality) = patch.data_quality {
                region.data_quality = Some(quality);
            }
            region.last_modified = Some(Utc::now());
        }

        self.version = self.version.saturating_add(1);
        self.record_event(
            EventKind::StateUpdated,
            Some(id.clone()),
            format!("region {id} updated"),
        );
        Ok(())
    }

    /// Replace a region's hazard facts.
    ///
    /// Stamps `last_updated` and delegates to [`RegionStore::set`].
    pub fn update_hazard_data(
        &mut self,
        id: &RegionId,
        fires: Vec<FireRecord>,
        statistics: Vec<YearlyStat>,
    ) -> Result<(), StoreError> {
        let hazard = HazardData {
            fires,
            statistics,
            last_updated: Some(Utc::now()),
        };
        self.set(
            id,
            RegionPatch {
                hazard_data: Some(hazard),
                ..RegionPatch::default()
            },
        )
    }

    /// Replace a region's zoning facts.
    ///
    /// Development percentages are recomputed from the given zone list
    /// only -- never accumulated with prior state.
    pub fn update_zoning_data(&mut self, id: &RegionId, zones: Vec<Zone>) -> Result<(), StoreError> {
        let (developed, underdeveloped) = development_percentages(&zones);
        let zoning = ZoningData {
            zones,
            developed_percentage: developed,
            underdeveloped_percentage: underdeveloped,
            last_updated: Some(Utc::now()),
        };
        self.set(
            id,
            RegionPatch {
                zoning_data: Some(zoning),
                ..RegionPatch::default()
            },
        )
    }

    /// Write a region's risk score and recompute the ranking table.
    ///
    /// Unlike [`RegionStore::set`], this requires the region to already
    /// exist. Stamps `last_analyzed` and rebuilds the global rankings from
    /// scratch: regions with a score, sorted descending by overall score
    /// with ascending region id as the tie-break, rank = 1-based position.
    pub fn update_risk_score(&mut self, id: &RegionId, score: RiskScore) -> Result<(), StoreError> {
        let region = self
            .regions
            .get_mut(id)
            .ok_or_else(|| StoreError::RegionNotFound(id.clone()))?;

        let overall = score.overall_score;
        region.risk_score = Some(score);
        region.last_analyzed = Some(Utc::now());
        region.last_modified = Some(Utc::now());

        self.version = self.version.saturating_add(1);
        self.recompute_rankings();
        info!(region = %id, score = overall, "risk score updated");
        self.record_event(
            EventKind::RiskScoreUpdated,
            Some(id.clone()),
            format!("region {id} scored {overall}"),
        );
        Ok(())
    }

    /// Append a conclusion to a region's ledger. Append-only: the list is
    /// never replaced wholesale.
    pub fn append_conclusion(
        &mut self,
        id: &RegionId,
        conclusion: AgentConclusion,
    ) -> Result<(), StoreError> {
        let region = self
            .regions
            .get_mut(id)
            .ok_or_else(|| StoreError::RegionNotFound(id.clone()))?;
        region.agent_conclusions.push(conclusion);
        region.last_modified = Some(Utc::now());
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    /// Append a report to a region's report list. Append-only.
    pub fn append_report(&mut self, id: &RegionId, report: RiskReport) -> Result<(), StoreError> {
        let region = self
            .regions
            .get_mut(id)
            .ok_or_else(|| StoreError::RegionNotFound(id.clone()))?;
        region.reports.push(report);
        region.last_modified = Some(Utc::now());
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    /// Record an event in the log and notify observers.
    pub fn emit_event(
        &mut self,
        kind: EventKind,
        region_id: Option<RegionId>,
        detail: String,
    ) -> StoreEvent {
        let event = self.events.emit(kind, region_id, detail);
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        event
    }

    /// Register a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Drop constraints whose validity window has passed. Returns the
    /// number removed.
    pub fn remove_expired_constraints(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.constraints.len();
        self.constraints
            .retain(|c| c.valid_until.is_none_or(|until| now <= until));
        before.saturating_sub(self.constraints.len())
    }

    /// Trim the live event log down to `keep` entries. Returns the number
    /// dropped.
    pub fn trim_events(&mut self, keep: usize) -> usize {
        self.events.trim_to(keep)
    }

    /// Register an observer notified on every emitted event.
    pub fn subscribe(&mut self, observer: Box<dyn StoreObserver>) {
        self.observers.push(observer);
    }

    /// Drop all state back to the initial empty store.
    ///
    /// Observers stay registered; the reset itself is the first event in
    /// the fresh log.
    pub fn reset(&mut self) {
        self.regions.clear();
        self.rankings.clear();
        self.constraints.clear();
        self.events.clear();
        self.version = 0;
        info!("store reset to initial state");
        self.record_event(EventKind::StoreReset, None, String::from("store reset"));
    }

    // -------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------

    /// Return a structurally independent copy of all collections.
    ///
    /// Safe to iterate while further mutation is in flight on the store
    /// itself.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: self.version,
            regions: self.regions.values().cloned().collect(),
            rankings: self.rankings.clone(),
            constraints: self.constraints.clone(),
            events: self.events.iter().cloned().collect(),
        }
    }

    /// Serialize to a map-friendly representation: a keyed list of region
    /// id/value pairs plus the constraint list and version counter.
    pub fn serialize(&self) -> SerializedStore {
        SerializedStore {
            version: self.version,
            regions: self
                .regions
                .iter()
                .map(|(id, region)| (id.clone(), region.clone()))
                .collect(),
            constraints: self.constraints.clone(),
        }
    }

    /// Reconstruct a store from its serialized representation.
    ///
    /// The ranking table is recomputed from the restored scores, so the
    /// result is equivalent to the original (same region set, scores, and
    /// ranking order). The event log and observers start fresh.
    pub fn deserialize(data: SerializedStore) -> Self {
        let mut store = Self {
            regions: data.regions.into_iter().collect(),
            version: data.version,
            events: EventLog::new(),
            constraints: data.constraints,
            rankings: Vec::new(),
            observers: Vec::new(),
        };
        store.recompute_rankings();
        store
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn record_event(&mut self, kind: EventKind, region_id: Option<RegionId>, detail: String) {
        let _ = self.emit_event(kind, region_id, detail);
    }

    /// Rebuild the ranking table from the current region scores.
    ///
    /// The table contains exactly the regions with a non-null score,
    /// sorted descending by overall score; ties break on ascending region
    /// id so the order is deterministic across restarts.
    fn recompute_rankings(&mut self) {
        let mut scored: Vec<(&RegionId, &Region, f64)> = self
            .regions
            .iter()
            .filter_map(|(id, region)| {
                region
                    .risk_score
                    .as_ref()
                    .map(|score| (id, region, score.overall_score))
            })
            .collect();

        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(b.0)));

        self.rankings = scored
            .into_iter()
            .enumerate()
            .map(|(index, (id, region, score))| RankingEntry {
                region_id: id.clone(),
                region_name: region.region_name.clone(),
                overall_score: score,
                rank: u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX),
            })
            .collect();
    }
}

/// Compute developed/underdeveloped percentages from a zone list.
///
/// Both percentages derive solely from the given zones; with no zoned
/// area both are zero. Their sum never exceeds 100.
pub fn development_percentages(zones: &[Zone]) -> (f64, f64) {
    let total: f64 = zones.iter().map(|z| z.area_ha.max(0.0)).sum();
    if total <= 0.0 {
        return (0.0, 0.0);
    }
    let developed: f64 = zones
        .iter()
        .filter(|z| z.status == wildrisk_types::DevelopmentStatus::Developed)
        .map(|z| z.area_ha.max(0.0))
        .sum();
    let developed_pct = developed / total * 100.0;
    let underdeveloped_pct = (total - developed) / total * 100.0;
    (developed_pct, underdeveloped_pct)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wildrisk_types::{
        DevelopmentStatus, ExposureAnalysis, FireTrend, LossAnalysis, LossVolatility,
        RiskCategory, VulnerabilityAnalysis, ZoneCategory,
    };

    use super::*;

    fn make_score(overall: f64) -> RiskScore {
        RiskScore {
            overall_score: overall,
            category: RiskCategory::from_score(overall),
            exposure: ExposureAnalysis {
                score: 10.0,
                area_score: 0.0,
                frequency_score: 0.0,
                major_event_score: 0.0,
                total_burned_ha: 0.0,
                fires_last_5y: 0,
                major_fires: 0,
                trend: FireTrend::Stable,
            },
            historical_loss: LossAnalysis {
                score: 15.0,
                cost_score: 0.0,
                structure_score: 0.0,
                concentration_score: 0.0,
                avg_annual_cost: 0.0,
                total_cost: 0.0,
                volatility: LossVolatility::Low,
            },
            vulnerability: VulnerabilityAnalysis {
                score: 20.0,
                developed_score: 0.0,
                exposure_value_score: 0.0,
                residential_score: 0.0,
                estimated_value: 0.0,
                developed_percentage: 0.0,
                population_estimate: 0.0,
            },
            climate_score: 60.0,
            confidence: 0.5,
        }
    }

    fn make_zone(id: &str, status: DevelopmentStatus, area: f64) -> Zone {
        Zone {
            zone_id: id.to_owned(),
            municipality: String::from("Kelowna"),
            category: ZoneCategory::Residential,
            status,
            area_ha: area,
        }
    }

    fn seeded_store() -> RegionStore {
        let mut store = RegionStore::new();
        for (name, region_type) in [
            ("Kelowna", RegionType::Municipality),
            ("Kamloops", RegionType::Municipality),
            ("Cariboo Fire Centre", RegionType::FireCentre),
        ] {
            store
                .set(
                    &RegionId::new(name),
                    RegionPatch {
                        region_name: Some(name.to_owned()),
                        region_type: Some(region_type),
                        ..RegionPatch::default()
                    },
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn set_creates_region_lazily_with_defaults() {
        let mut store = RegionStore::new();
        let id = RegionId::new("Vernon");
        store.set(&id, RegionPatch::default()).unwrap();

        let region = store.get(&id).unwrap();
        assert_eq!(region.region_name, "vernon");
        assert_eq!(region.region_type, RegionType::Municipality);
        assert!(region.risk_score.is_none());
        assert!(region.last_modified.is_some());
    }

    #[test]
    fn set_merge_is_shallow_replace_per_field() {
        let mut store = seeded_store();
        let id = RegionId::new("Kelowna");

        store
            .update_hazard_data(
                &id,
                vec![FireRecord {
                    fire_number: String::from("K52125"),
                    year: 2023,
                    size_ha: 1200.0,
                    cause: None,
                }],
                Vec::new(),
            )
            .unwrap();

        // A later patch without hazard data leaves it untouched.
        store
            .set(
                &id,
                RegionPatch {
                    region_name: Some(String::from("City of Kelowna")),
                    ..RegionPatch::default()
                },
            )
            .unwrap();

        let region = store.get(&id).unwrap();
        assert_eq!(region.region_name, "City of Kelowna");
        assert_eq!(region.hazard_data.fires.len(), 1);

        // A patch with hazard data replaces the whole sub-object.
        store.update_hazard_data(&id, Vec::new(), Vec::new()).unwrap();
        assert!(store.get(&id).unwrap().hazard_data.fires.is_empty());
    }

    #[test]
    fn set_bumps_version_and_emits_event() {
        let mut store = RegionStore::new();
        let id = RegionId::new("Vernon");
        assert_eq!(store.version(), 0);
        store.set(&id, RegionPatch::default()).unwrap();
        assert_eq!(store.version(), 1);
        assert!(
            store
                .events()
                .any(|e| e.kind == EventKind::StateUpdated && e.region_id == Some(id.clone()))
        );
    }

    #[test]
    fn zoning_percentages_recomputed_never_accumulated() {
        let mut store = seeded_store();
        let id = RegionId::new("Kelowna");

        store
            .update_zoning_data(
                &id,
                vec![
                    make_zone("z1", DevelopmentStatus::Developed, 60.0),
                    make_zone("z2", DevelopmentStatus::Underdeveloped, 40.0),
                ],
            )
            .unwrap();
        let zoning = &store.get(&id).unwrap().zoning_data;
        assert!((zoning.developed_percentage - 60.0).abs() < 1e-9);
        assert!((zoning.underdeveloped_percentage - 40.0).abs() < 1e-9);

        // Writing again with a different list replaces, never adds.
        store
            .update_zoning_data(&id, vec![make_zone("z3", DevelopmentStatus::Developed, 10.0)])
            .unwrap();
        let zoning = &store.get(&id).unwrap().zoning_data;
        assert_eq!(zoning.zones.len(), 1);
        assert!((zoning.developed_percentage - 100.0).abs() < 1e-9);
        assert!(
            zoning.developed_percentage + zoning.underdeveloped_percentage <= 100.0 + 1e-9
        );
    }

    #[test]
    fn update_risk_score_requires_existing_region() {
        let mut store = RegionStore::new();
        let id = RegionId::new("Nowhere");
        let result = store.update_risk_score(&id, make_score(50.0));
        assert!(matches!(result, Err(StoreError::RegionNotFound(_))));
    }

    #[test]
    fn rankings_sorted_descending_with_dense_ranks() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(72.0))
            .unwrap();
        store
            .update_risk_score(&RegionId::new("Kamloops"), make_score(55.0))
            .unwrap();
        store
            .update_risk_score(&RegionId::new("Cariboo Fire Centre"), make_score(83.0))
            .unwrap();

        let rankings = store.get_rankings(None);
        assert_eq!(rankings.len(), 3);
        let ranks: Vec<u32> = rankings.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        let ids: Vec<&str> = rankings.iter().map(|r| r.region_id.as_str()).collect();
        assert_eq!(ids, vec!["cariboo-fire-centre", "kelowna", "kamloops"]);
    }

    #[test]
    fn ranking_table_covers_exactly_scored_regions() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(40.0))
            .unwrap();
        assert_eq!(store.get_rankings(None).len(), 1);
        assert_eq!(store.region_count(), 3);
    }

    #[test]
    fn ranking_ties_break_on_ascending_region_id() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(50.0))
            .unwrap();
        store
            .update_risk_score(&RegionId::new("Kamloops"), make_score(50.0))
            .unwrap();

        let rankings = store.get_rankings(None);
        let ids: Vec<&str> = rankings.iter().map(|r| r.region_id.as_str()).collect();
        assert_eq!(ids, vec!["kamloops", "kelowna"]);
    }

    #[test]
    fn rankings_respect_limit() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(70.0))
            .unwrap();
        store
            .update_risk_score(&RegionId::new("Kamloops"), make_score(60.0))
            .unwrap();
        assert_eq!(store.get_rankings(Some(1)).len(), 1);
        assert_eq!(store.get_rankings(Some(10)).len(), 2);
    }

    #[test]
    fn list_regions_counts_match_for_every_filter() {
        let store = seeded_store();

        for filter in [
            None,
            Some(RegionType::Municipality),
            Some(RegionType::FireCentre),
            Some(RegionType::FireZone),
            Some(RegionType::RegionalDistrict),
        ] {
            let list = store.list_regions(filter);
            assert_eq!(list.counts.total, list.regions.len());
        }

        let municipalities = store.list_regions(Some(RegionType::Municipality));
        assert_eq!(municipalities.counts.total, 2);
        let zones = store.list_regions(Some(RegionType::FireZone));
        assert_eq!(zones.counts.total, 0);
        assert!(zones.regions.is_empty());
    }

    #[test]
    fn serialize_deserialize_reproduces_equivalent_store() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(72.0))
            .unwrap();
        store
            .update_risk_score(&RegionId::new("Kamloops"), make_score(55.0))
            .unwrap();

        let serialized = store.serialize();
        let json = serde_json::to_string(&serialized).unwrap();
        let restored_repr: SerializedStore = serde_json::from_str(&json).unwrap();
        let restored = RegionStore::deserialize(restored_repr);

        assert_eq!(restored.region_count(), store.region_count());
        assert_eq!(restored.version(), store.version());

        let original_rankings = store.get_rankings(None);
        let restored_rankings = restored.get_rankings(None);
        assert_eq!(original_rankings.len(), restored_rankings.len());
        for (a, b) in original_rankings.iter().zip(restored_rankings.iter()) {
            assert_eq!(a.region_id, b.region_id);
            assert_eq!(a.rank, b.rank);
            assert!((a.overall_score - b.overall_score).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn reset_drops_all_state() {
        let mut store = seeded_store();
        store
            .update_risk_score(&RegionId::new("Kelowna"), make_score(72.0))
            .unwrap();
        store.reset();
        assert_eq!(store.region_count(), 0);
        assert_eq!(store.version(), 0);
        assert!(store.get_rankings(None).is_empty());
        // The reset event is the only entry in the fresh log.
        assert_eq!(store.events().count(), 1);
    }

    #[test]
    fn observers_are_notified_on_mutation() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        // The box disappears into the store, so the counter shares its
        // tally through an Arc held on this side.
        struct Counter {
            seen: Arc<AtomicUsize>,
        }
        impl StoreObserver for Counter {
            fn on_event(&mut self, _event: &StoreEvent) {
                self.seen.fetch_add(1, Ordering::SeqCst);
            }
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let mut store = RegionStore::new();
        store.subscribe(Box::new(Counter { seen: Arc::clone(&seen) }));
        store.set(&RegionId::new("Vernon"), RegionPatch::default()).unwrap();
        // RegionCreated + StateUpdated.
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(store.events().count(), 2);
    }

    #[test]
    fn appends_grow_lists_without_replacement() {
        let mut store = seeded_store();
        let id = RegionId::new("Kelowna");
        store
            .append_conclusion(
                &id,
                AgentConclusion {
                    id: wildrisk_types::ConclusionId::new(),
                    agent: wildrisk_types::CrewStage::RiskScorer,
                    summary: String::from("first"),
                    confidence: 0.8,
                    sources: Vec::new(),
                    created_at: Utc::now(),
                },
            )
            .unwrap();
        store
            .append_conclusion(
                &id,
                AgentConclusion {
                    id: wildrisk_types::ConclusionId::new(),
                    agent: wildrisk_types::CrewStage::RiskScorer,
                    summary: String::from("second"),
                    confidence: 0.8,
                    sources: Vec::new(),
                    created_at: Utc::now(),
                },
            )
            .unwrap();
        assert_eq!(store.get(&id).unwrap().agent_conclusions.len(), 2);
    }

    #[test]
    fn expired_constraints_are_removed() {
        use chrono::Duration;

        let mut store = RegionStore::new();
        let now = Utc::now();
        store.add_constraint(Constraint {
            id: wildrisk_types::ConstraintId::new(),
            description: String::from("expired"),
            valid_from: now - Duration::days(30),
            valid_until: Some(now - Duration::days(1)),
        });
        store.add_constraint(Constraint {
            id: wildrisk_types::ConstraintId::new(),
            description: String::from("open-ended"),
            valid_from: now - Duration::days(30),
            valid_until: None,
        });

        let removed = store.remove_expired_constraints(now);
        assert_eq!(removed, 1);
        assert_eq!(store.active_constraints(now).len(), 1);
    }

    #[test]
    fn development_percentages_empty_zones() {
        let (dev, under) = development_percentages(&[]);
        assert!((dev - 0.0).abs() < f64::EPSILON);
        assert!((under - 0.0).abs() < f64::EPSILON);
    }
}
