//! Live refresh of the facility panel.
//!
//! Mounting happens under the write lock so callers observe the seeded
//! panel immediately; the upstream search then runs on a spawned task and
//! its result is applied only if the ticket is still current.

use std::sync::Arc;

use dispatch_core::{Coordinate, FacilityPanel, RawFacility, RefreshOutcome, RefreshTicket};
use dispatch_places::PlacesClient;
use tokio::{sync::RwLock, task::JoinHandle};

use crate::api::AppState;

/// Remounts the panel and spawns its one live fetch.
pub async fn begin_refresh(state: &AppState) -> JoinHandle<RefreshOutcome> {
    let (ticket, center) = {
        let mut panel = state.panel.write().await;
        let ticket = panel.mount();
        (ticket, panel.config().reference)
    };

    let panel = Arc::clone(&state.panel);
    let places = state.places.clone();
    let radius = state.search_radius;
    tokio::spawn(async move {
        complete_refresh(&panel, places.as_ref(), ticket, center, radius).await
    })
}

/// Runs the search for `ticket` and applies whatever came back.
pub async fn complete_refresh(
    panel: &RwLock<FacilityPanel>,
    places: Option<&PlacesClient>,
    ticket: RefreshTicket,
    center: Coordinate,
    radius: u32,
) -> RefreshOutcome {
    let result: Result<Vec<RawFacility>, String> = match places {
        None => {
            tracing::warn!("places api key not configured; panel stays on seed data");
            Err("places api key not configured".to_owned())
        }
        Some(client) => match client.search_emergency_facilities(center, radius).await {
            Ok(found) => Ok(found.into_iter().map(RawFacility::from).collect()),
            Err(e) => {
                tracing::warn!(error = %e, generation = ticket.generation(), "live facility search failed");
                Err(e.to_string())
            }
        },
    };

    let outcome = panel.write().await.apply(ticket, result);
    match &outcome {
        RefreshOutcome::Applied { count, markers } => tracing::info!(
            count,
            added = markers.added.len(),
            removed = markers.removed.len(),
            generation = ticket.generation(),
            "facility panel switched to live results"
        ),
        RefreshOutcome::Kept => {
            tracing::debug!(generation = ticket.generation(), "facility panel kept current list");
        }
        RefreshOutcome::Stale => {}
    }
    outcome
}
