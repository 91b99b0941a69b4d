//! Upstream text-search wire types.
//!
//! Fields the dashboard does not read are kept in `extra` so the proxy can
//! return results in the upstream schema unchanged.

use dispatch_core::{Coordinate, RawFacility};
use serde::{Deserialize, Serialize};

/// Envelope of one `textsearch/json` call.
#[derive(Debug, Clone, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl TextSearchResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

impl From<Place> for RawFacility {
    fn from(place: Place) -> Self {
        RawFacility {
            place_id: place.place_id,
            name: place.name,
            position: place.geometry.location.into(),
            address: place.vicinity.or(place.formatted_address),
            rating: place.rating,
        }
    }
}
