mod advisories;
mod dashboard;
mod facilities;
mod hospitals;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use dispatch_core::{AdvisoryBoard, AdvisoryFeed, FacilityPanel};
use dispatch_places::PlacesClient;
use serde::Serialize;
use tokio::sync::{broadcast, watch, RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no place-search key is configured.
    pub places: Option<PlacesClient>,
    pub panel: Arc<RwLock<FacilityPanel>>,
    pub advisories: Arc<RwLock<AdvisoryBoard>>,
    /// Board snapshots published by the advisory poller after each change.
    pub advisory_events: broadcast::Sender<AdvisoryFeed>,
    /// Flips to `true` when the server starts shutting down; ends open streams.
    pub shutdown: watch::Receiver<bool>,
    /// Radius the facility panel searches with.
    pub search_radius: u32,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    places_api: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, req_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(req_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

/// Routes that spend upstream place-search quota, sharing one request budget.
///
/// The proxy sits at the path the dashboard front end calls.
fn upstream_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/hospitals", get(hospitals::search_hospitals))
        .route(
            "/api/v1/facilities/refresh",
            post(facilities::refresh_facilities),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

fn dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/facilities", get(facilities::get_facilities))
        .route("/api/v1/advisories", get(advisories::get_advisories))
        .route(
            "/api/v1/advisories/stream",
            get(advisories::stream_advisories),
        )
        .route("/api/v1/hotlines", get(dashboard::list_hotlines))
        .route("/api/v1/report", get(dashboard::get_report))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .merge(upstream_router(rate_limit))
        .merge(dashboard_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let places_api = if state.places.is_some() {
        "configured"
    } else {
        "missing"
    };
    ApiResponse::new(
        HealthData {
            status: "ok",
            places_api,
        },
        req_id,
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use dispatch_core::{AdvisoryBoard, Coordinate, FacilityPanel, RankingConfig};
    use dispatch_places::PlacesClient;
    use tokio::sync::{broadcast, watch, RwLock};
    use tower::ServiceExt;

    use super::{build_app, AppState};
    use crate::middleware::RateLimitState;

    pub(crate) fn test_state(places_base_url: Option<&str>) -> AppState {
        let ranking = RankingConfig::new(Coordinate::new(37.8715, -122.2730), 2.0);
        AppState {
            places: places_base_url.map(|url| {
                PlacesClient::with_base_url("test-key", 5, url).expect("places client")
            }),
            panel: Arc::new(RwLock::new(FacilityPanel::new(ranking))),
            advisories: Arc::new(RwLock::new(AdvisoryBoard::default())),
            advisory_events: broadcast::channel(16).0,
            shutdown: watch::channel(false).1,
            search_radius: 5000,
        }
    }

    pub(crate) fn test_app(state: AppState) -> Router {
        build_app(state, RateLimitState::per_minute(1_000))
    }

    pub(crate) async fn send(
        app: Router,
        method: &str,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };
        (status, json)
    }
}
