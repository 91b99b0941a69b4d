use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use dispatch_core::AdvisoryFeed;
use futures::{stream, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

/// Both advisory logs, newest first.
pub(super) async fn get_advisories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<AdvisoryFeed>> {
    let snapshot = state.advisories.read().await.snapshot();
    ApiResponse::new(snapshot, req_id)
}

/// Server-sent events: the current board as `connection_established`, then
/// one `suggestions_update` with the full board after every change.
///
/// Every event carries the whole board, so a subscriber that lags behind
/// simply skips to the newest snapshot. Streams end when the server begins
/// shutting down.
pub(super) async fn stream_advisories(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    // Subscribe before reading the board so no change falls in between.
    let receiver = state.advisory_events.subscribe();
    let initial = state.advisories.read().await.snapshot();
    tracing::info!(
        subscribers = state.advisory_events.receiver_count(),
        "advisory stream subscriber connected"
    );

    let first = stream::once(async move {
        Event::default()
            .event("connection_established")
            .json_data(&initial)
    });
    let updates = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(feed) => {
                    let event = Event::default().event("suggestions_update").json_data(&feed);
                    return Some((event, receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "advisory stream subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let mut shutdown = state.shutdown.clone();
    let stopping = async move {
        if shutdown.wait_for(|stopping| *stopping).await.is_err() {
            // No shutdown sender: the stream lives as long as the client.
            std::future::pending::<()>().await;
        }
    };

    Sse::new(first.chain(updates).take_until(stopping)).keep_alive(KeepAlive::default())
}
