use axum::{extract::State, Extension, Json};
use dispatch_core::{Facility, FacilityPanel, Marker, PanelSource};
use serde::Serialize;

use crate::{middleware::RequestId, panel_refresh::begin_refresh};

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct FacilitiesView {
    pub state: PanelSource,
    pub generation: u64,
    pub facilities: Vec<Facility>,
    pub markers: Vec<Marker>,
}

impl FacilitiesView {
    fn from_panel(panel: &FacilityPanel) -> Self {
        Self {
            state: panel.source(),
            generation: panel.generation(),
            facilities: panel.display().to_vec(),
            markers: panel.markers().markers(),
        }
    }
}

pub(super) async fn get_facilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FacilitiesView>> {
    let view = FacilitiesView::from_panel(&*state.panel.read().await);
    ApiResponse::new(view, req_id)
}

/// Remounts the panel: reseeds, bumps the generation and starts a new live
/// fetch. The response is the seeded view; poll `GET` for the live one.
pub(super) async fn refresh_facilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<FacilitiesView>> {
    // The handle is dropped; the task runs to completion on its own.
    let _refresh = begin_refresh(&state).await;
    let view = FacilitiesView::from_panel(&*state.panel.read().await);
    ApiResponse::new(view, req_id)
}
