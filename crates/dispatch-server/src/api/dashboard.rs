use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use dispatch_core::{hotlines, CallReport};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct ReportQuery {
    pub format: Option<String>,
}

pub(super) async fn list_hotlines(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::new(hotlines(), req_id)
}

/// The after-call report, as JSON by default or `?format=text`.
pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let report = {
        let board = state.advisories.read().await;
        let panel = state.panel.read().await;
        CallReport::build(&board, &panel, Utc::now())
    };

    match query.format.as_deref() {
        None | Some("json") => Ok(ApiResponse::new(report, req_id).into_response()),
        Some("text") => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.to_text(),
        )
            .into_response()),
        Some(other) => Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!("unsupported report format: {other}"),
        )),
    }
}
