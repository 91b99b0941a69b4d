//! The place-search proxy consumed by the dashboard map.
//!
//! Error bodies are flat `{ "error": ".." }` objects rather than the
//! `/api/v1` envelope, matching what the front end already parses.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dispatch_core::Coordinate;
use dispatch_places::Place;
use serde::{Deserialize, Serialize};

use super::AppState;

const DEFAULT_RADIUS: u32 = 5000;

#[derive(Debug, Default, Deserialize)]
pub(super) struct HospitalsQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct HospitalsResponse {
    pub status: &'static str,
    pub results: Vec<Place>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ProxyError {
    MissingApiKey,
    MissingCoordinates,
    NonNumericCoordinates,
    InvalidRadius,
    Upstream,
}

impl ProxyError {
    fn status(self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingCoordinates | Self::NonNumericCoordinates | Self::InvalidRadius => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingApiKey => "API key not configured",
            Self::MissingCoordinates => "Latitude and longitude required",
            Self::NonNumericCoordinates => "Latitude and longitude must be numeric",
            Self::InvalidRadius => "Radius must be a positive integer",
            Self::Upstream => "Failed to fetch emergency hospitals",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.message() })),
        )
            .into_response()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validates the query into a search center and radius.
fn parse_query(query: &HospitalsQuery) -> Result<(Coordinate, u32), ProxyError> {
    let (Some(lat), Some(lng)) = (
        non_blank(query.lat.as_deref()),
        non_blank(query.lng.as_deref()),
    ) else {
        return Err(ProxyError::MissingCoordinates);
    };

    let lat: f64 = lat.parse().map_err(|_| ProxyError::NonNumericCoordinates)?;
    let lng: f64 = lng.parse().map_err(|_| ProxyError::NonNumericCoordinates)?;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(ProxyError::NonNumericCoordinates);
    }

    let radius = match non_blank(query.radius.as_deref()) {
        None => DEFAULT_RADIUS,
        Some(raw) => match raw.parse::<u32>() {
            Ok(r) if r > 0 => r,
            _ => return Err(ProxyError::InvalidRadius),
        },
    };

    Ok((Coordinate::new(lat, lng), radius))
}

pub(super) async fn search_hospitals(
    State(state): State<AppState>,
    Query(query): Query<HospitalsQuery>,
) -> Result<Json<HospitalsResponse>, ProxyError> {
    let Some(client) = state.places.as_ref() else {
        return Err(ProxyError::MissingApiKey);
    };
    let (center, radius) = parse_query(&query)?;

    let results = client
        .search_emergency_facilities(center, radius)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %center, radius, "place search proxy failed");
            ProxyError::Upstream
        })?;

    tracing::debug!(count = results.len(), %center, radius, "place search proxy ok");
    Ok(Json(HospitalsResponse {
        status: "OK",
        results,
    }))
}
