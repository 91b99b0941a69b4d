mod api;
mod middleware;
mod panel_refresh;
mod scheduler;

use std::sync::Arc;

use dispatch_core::{AdvisoryBoard, FacilityPanel, JsonFileStore};
use dispatch_places::PlacesClient;
use tokio::sync::{broadcast, watch, RwLock};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
    scheduler::AdvisoryPoller,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(dispatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting dispatch server");

    let places = match config.places_api_key.as_deref() {
        Some(key) => Some(PlacesClient::with_base_url(
            key,
            config.places_timeout_secs,
            &config.places_base_url,
        )?),
        None => {
            tracing::warn!("GOOGLE_PLACES_API_KEY not set; proxy will return 500 and the panel stays seeded");
            None
        }
    };

    // Snapshots only; a slow subscriber skips straight to the newest one.
    let (advisory_events, _) = broadcast::channel(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState {
        places,
        panel: Arc::new(RwLock::new(FacilityPanel::new(config.ranking()))),
        advisories: Arc::new(RwLock::new(AdvisoryBoard::with_capacity(
            config.advisory_capacity,
        ))),
        advisory_events: advisory_events.clone(),
        shutdown: shutdown_rx,
        search_radius: config.search_radius,
    };

    let poller = AdvisoryPoller::new(
        config.advisory_feed.clone(),
        Arc::clone(&state.advisories),
        advisory_events,
        JsonFileStore::new(config.advisory_store_path.clone()),
        config.advisory_feed_timeout(),
    )?;
    let mut scheduler =
        scheduler::build_scheduler(poller, config.advisory_poll_interval()).await?;

    // The panel is mounted by construction; this starts its one live fetch.
    let _initial_refresh = panel_refresh::begin_refresh(&state).await;

    let app = build_app(
        state.clone(),
        RateLimitState::per_minute(config.proxy_rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Open advisory streams would otherwise hold the server open.
            let _ = shutdown_tx.send(true);
        })
        .await?;

    scheduler.shutdown().await?;
    state.panel.write().await.close();
    tracing::info!("dispatch server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
