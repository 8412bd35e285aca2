//! Canned feed data for offline (fixture-mode) runs.
//!
//! Values are shaped like real BC feeds -- provincial fire numbers,
//! plausible perimeter sizes, municipal zoning mixes -- but they are
//! demonstration data, not measurements.

use wildrisk_ingest::{FixtureHazardSource, FixtureZoningSource, HazardSource, ZoningSource};
use wildrisk_types::{DevelopmentStatus, FireRecord, YearlyStat, Zone, ZoneCategory};

/// Build seeded fixture sources covering the default tracked regions.
pub fn seeded_sources() -> (HazardSource, ZoningSource) {
    let hazard = FixtureHazardSource::new()
        .with_region(
            "Kelowna",
            vec![
                fire("K52125", 2023, 13_970.0, Some("Lightning")),
                fire("K51847", 2023, 2_100.0, Some("Human")),
                fire("K50311", 2021, 83_000.0, Some("Lightning")),
                fire("K42019", 2020, 450.0, None),
            ],
            vec![
                stat(2023, 28_000_000.0, 190, 31, 96_500.0),
                stat(2022, 3_500_000.0, 4, 18, 5_200.0),
                stat(2021, 19_000_000.0, 78, 26, 88_300.0),
            ],
        )
        .with_region(
            "Kamloops",
            vec![
                fire("K61204", 2023, 5_600.0, Some("Lightning")),
                fire("K60783", 2021, 44_000.0, Some("Lightning")),
            ],
            vec![
                stat(2023, 9_000_000.0, 22, 14, 51_000.0),
                stat(2021, 12_500_000.0, 35, 19, 47_800.0),
            ],
        )
        .with_region(
            "Prince George",
            vec![fire("G80412", 2024, 8_900.0, Some("Lightning"))],
            vec![stat(2024, 4_200_000.0, 6, 11, 12_400.0)],
        )
        .with_region(
            "Vernon",
            vec![fire("K71530", 2021, 1_300.0, Some("Human"))],
            vec![stat(2021, 1_800_000.0, 3, 7, 2_900.0)],
        )
        .with_region("Nanaimo", Vec::new(), Vec::new());

    let zoning = FixtureZoningSource::new()
        .with_municipality(
            "Kelowna",
            vec![
                zone("KEL-R1", "Kelowna", ZoneCategory::Residential, DevelopmentStatus::Developed, 820.0),
                zone("KEL-R2", "Kelowna", ZoneCategory::Residential, DevelopmentStatus::Underdeveloped, 310.0),
                zone("KEL-C1", "Kelowna", ZoneCategory::Commercial, DevelopmentStatus::Developed, 140.0),
                zone("KEL-A1", "Kelowna", ZoneCategory::Agricultural, DevelopmentStatus::Developed, 1_900.0),
            ],
        )
        .with_municipality(
            "Kamloops",
            vec![
                zone("KAM-R1", "Kamloops", ZoneCategory::Residential, DevelopmentStatus::Developed, 640.0),
                zone("KAM-I1", "Kamloops", ZoneCategory::Industrial, DevelopmentStatus::Developed, 220.0),
                zone("KAM-P1", "Kamloops", ZoneCategory::Parkland, DevelopmentStatus::Underdeveloped, 1_100.0),
            ],
        )
        .with_municipality(
            "Prince George",
            vec![
                zone("PG-R1", "Prince George", ZoneCategory::Residential, DevelopmentStatus::Developed, 540.0),
                zone("PG-M1", "Prince George", ZoneCategory::MixedUse, DevelopmentStatus::Underdeveloped, 260.0),
            ],
        )
        .with_municipality(
            "Vernon",
            vec![zone("VER-R1", "Vernon", ZoneCategory::Residential, DevelopmentStatus::Developed, 410.0)],
        )
        .with_municipality(
            "Nanaimo",
            vec![zone("NAN-U1", "Nanaimo", ZoneCategory::Rural, DevelopmentStatus::Underdeveloped, 780.0)],
        );

    (HazardSource::Fixture(hazard), ZoningSource::Fixture(zoning))
}

fn fire(number: &str, year: i32, size_ha: f64, cause: Option<&str>) -> FireRecord {
    FireRecord {
        fire_number: number.to_owned(),
        year,
        size_ha,
        cause: cause.map(ToOwned::to_owned),
    }
}

const fn stat(year: i32, total_cost: f64, structures_destroyed: u32, fire_count: u32, hectares_burned: f64) -> YearlyStat {
    YearlyStat {
        year,
        total_cost,
        structures_destroyed,
        fire_count,
        hectares_burned,
    }
}

fn zone(
    zone_id: &str,
    municipality: &str,
    category: ZoneCategory,
    status: DevelopmentStatus,
    area_ha: f64,
) -> Zone {
    Zone {
        zone_id: zone_id.to_owned(),
        municipality: municipality.to_owned(),
        category,
        status,
        area_ha,
    }
}
