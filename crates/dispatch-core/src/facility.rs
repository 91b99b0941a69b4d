//! Facility model and live-result ranking.

use serde::{Deserialize, Serialize};

use crate::geo::{eta_minutes, haversine_miles, Coordinate};

/// Maximum facilities kept after a live refresh.
pub const MAX_RANKED_FACILITIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Hospital,
    MedicalCenter,
    UrgentCare,
}

impl FacilityCategory {
    /// Classifies a place by its display name.
    ///
    /// "urgent care" wins over "medical center"; anything else is a hospital
    /// because both upstream searches are biased toward emergency care.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("urgent care") {
            Self::UrgentCare
        } else if lower.contains("medical center") {
            Self::MedicalCenter
        } else {
            Self::Hospital
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::MedicalCenter => "medical_center",
            Self::UrgentCare => "urgent_care",
        }
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A place as returned by the search proxy, before ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFacility {
    pub place_id: Option<String>,
    pub name: String,
    pub position: Coordinate,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

/// A ranked facility. Rebuilt wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Place id when known, otherwise derived from name and position.
    pub key: String,
    pub name: String,
    pub category: FacilityCategory,
    pub position: Coordinate,
    pub distance_miles: f64,
    pub eta_minutes: u32,
    pub address: Option<String>,
    pub rating: Option<f64>,
}

impl Facility {
    /// Builds a facility from a raw place, measuring from `config.reference`.
    #[must_use]
    pub fn from_raw(raw: RawFacility, config: &RankingConfig) -> Self {
        let distance_miles = haversine_miles(config.reference, raw.position);
        let key = raw
            .place_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| derived_key(&raw.name, raw.position));

        Self {
            key,
            category: FacilityCategory::classify(&raw.name),
            name: raw.name,
            position: raw.position,
            distance_miles,
            eta_minutes: eta_minutes(distance_miles, config.minutes_per_mile),
            address: raw.address,
            rating: raw.rating,
        }
    }
}

/// Fallback identity for places without an upstream id.
///
/// Coordinates are rounded to ~11 m so jitter between refreshes keeps the key.
fn derived_key(name: &str, position: Coordinate) -> String {
    format!(
        "{}@{:.4},{:.4}",
        name.trim().to_lowercase(),
        position.lat,
        position.lng
    )
}

/// Inputs that used to be module constants in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub reference: Coordinate,
    pub minutes_per_mile: f64,
    pub max_results: usize,
}

impl RankingConfig {
    #[must_use]
    pub fn new(reference: Coordinate, minutes_per_mile: f64) -> Self {
        Self {
            reference,
            minutes_per_mile,
            max_results: MAX_RANKED_FACILITIES,
        }
    }
}

/// Recomputes distance and ETA for every place, sorts ascending by distance
/// and keeps the nearest `config.max_results`.
///
/// The sort is stable, so equidistant places keep their upstream order.
#[must_use]
pub fn rank_facilities(raw: Vec<RawFacility>, config: &RankingConfig) -> Vec<Facility> {
    let mut ranked: Vec<Facility> = raw
        .into_iter()
        .map(|place| Facility::from_raw(place, config))
        .collect();
    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked.truncate(config.max_results);
    ranked
}
