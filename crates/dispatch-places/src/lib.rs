//! Client for the upstream place text-search API and the emergency-facility
//! fan-out built on top of it.

pub mod client;
pub mod error;
pub mod merge;
pub mod types;

pub use client::{PlacesClient, SearchQuery};
pub use error::PlacesError;
pub use merge::{merge_by_place_id, MAX_MERGED_RESULTS};
pub use types::{Geometry, LatLng, Place, TextSearchResponse};
