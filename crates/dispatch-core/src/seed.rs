//! Known-good facilities shown before (or instead of) live search results.
//!
//! Distances are precomputed from the default reference point
//! (downtown Berkeley, 37.8715, -122.2730) and the list is already sorted.
//! A panel configured with another reference point or ETA rate gets the same
//! entries remeasured and re-sorted by [`seed_facilities_for`].

use crate::facility::{Facility, FacilityCategory, RankingConfig};
use crate::geo::{eta_minutes, haversine_miles, Coordinate};

/// Reference point the precomputed seed distances were measured from.
pub const SEED_REFERENCE: Coordinate = Coordinate::new(37.8715, -122.2730);
const SEED_MINUTES_PER_MILE: f64 = 2.0;

struct SeedEntry {
    key: &'static str,
    name: &'static str,
    category: FacilityCategory,
    lat: f64,
    lng: f64,
    distance_miles: f64,
    eta_minutes: u32,
    address: &'static str,
}

const SEED: [SeedEntry; 5] = [
    SeedEntry {
        key: "seed-telegraph-urgent-care",
        name: "Telegraph Urgent Care",
        category: FacilityCategory::UrgentCare,
        lat: 37.8570,
        lng: -122.2593,
        distance_miles: 1.25,
        eta_minutes: 2,
        address: "2920 Telegraph Ave, Berkeley, CA",
    },
    SeedEntry {
        key: "seed-alta-bates",
        name: "Alta Bates Summit Medical Center",
        category: FacilityCategory::MedicalCenter,
        lat: 37.8564,
        lng: -122.2573,
        distance_miles: 1.35,
        eta_minutes: 3,
        address: "2450 Ashby Ave, Berkeley, CA",
    },
    SeedEntry {
        key: "seed-benioff-oakland",
        name: "UCSF Benioff Children's Hospital Oakland",
        category: FacilityCategory::Hospital,
        lat: 37.8373,
        lng: -122.2669,
        distance_miles: 2.39,
        eta_minutes: 5,
        address: "747 52nd St, Oakland, CA",
    },
    SeedEntry {
        key: "seed-kaiser-oakland",
        name: "Kaiser Permanente Oakland Medical Center",
        category: FacilityCategory::MedicalCenter,
        lat: 37.8245,
        lng: -122.2551,
        distance_miles: 3.39,
        eta_minutes: 7,
        address: "3600 Broadway, Oakland, CA",
    },
    SeedEntry {
        key: "seed-highland",
        name: "Highland Hospital",
        category: FacilityCategory::Hospital,
        lat: 37.7990,
        lng: -122.2312,
        distance_miles: 5.50,
        eta_minutes: 11,
        address: "1411 E 31st St, Oakland, CA",
    },
];

/// The static fallback list. Never re-sorted.
#[must_use]
pub fn seed_facilities() -> Vec<Facility> {
    SEED.iter()
        .map(|entry| Facility {
            key: entry.key.to_string(),
            name: entry.name.to_string(),
            category: entry.category,
            position: Coordinate::new(entry.lat, entry.lng),
            distance_miles: entry.distance_miles,
            eta_minutes: entry.eta_minutes,
            address: Some(entry.address.to_string()),
            rating: None,
        })
        .collect()
}

/// The seed list as seen from `config`.
///
/// Under the default reference and rate this is exactly [`seed_facilities`].
#[must_use]
pub fn seed_facilities_for(config: &RankingConfig) -> Vec<Facility> {
    let mut seed = seed_facilities();
    #[allow(clippy::float_cmp)]
    let precomputed = config.reference == SEED_REFERENCE
        && config.minutes_per_mile == SEED_MINUTES_PER_MILE;
    if precomputed {
        return seed;
    }

    for facility in &mut seed {
        facility.distance_miles = haversine_miles(config.reference, facility.position);
        facility.eta_minutes = eta_minutes(facility.distance_miles, config.minutes_per_mile);
    }
    seed.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: Coordinate = SEED_REFERENCE;

    #[test]
    fn seed_has_five_entries_sorted_by_distance() {
        let seed = seed_facilities();
        assert_eq!(seed.len(), 5);
        assert!(seed
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn precomputed_distances_match_haversine() {
        for facility in seed_facilities() {
            let computed = haversine_miles(REFERENCE, facility.position);
            assert!(
                (computed - facility.distance_miles).abs() < 0.01,
                "{}: precomputed {} vs computed {computed}",
                facility.name,
                facility.distance_miles
            );
            assert_eq!(
                eta_minutes(computed, 2.0),
                facility.eta_minutes,
                "{}",
                facility.name
            );
        }
    }

    #[test]
    fn seed_keys_are_unique() {
        let seed = seed_facilities();
        let mut keys: Vec<&str> = seed.iter().map(|f| f.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), seed.len());
    }

    #[test]
    fn default_config_uses_precomputed_seed() {
        let config = RankingConfig::new(SEED_REFERENCE, 2.0);
        assert_eq!(seed_facilities_for(&config), seed_facilities());
    }

    #[test]
    fn other_rate_recomputes_eta_only() {
        let config = RankingConfig::new(SEED_REFERENCE, 3.0);
        let seed = seed_facilities_for(&config);
        let highland = seed.last().expect("seed entries");
        assert_eq!(highland.key, "seed-highland");
        assert_eq!(highland.eta_minutes, 17);
    }

    #[test]
    fn moved_reference_resorts_seed() {
        let config = RankingConfig::new(Coordinate::new(37.7990, -122.2312), 2.0);
        let seed = seed_facilities_for(&config);
        assert_eq!(seed[0].key, "seed-highland");
        assert!(seed
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }
}
