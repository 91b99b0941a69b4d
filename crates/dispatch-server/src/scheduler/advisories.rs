//! Advisory feed polling.
//!
//! Each poll reads the feed, folds unseen lines into the shared board and
//! writes both logs through to the store. A write that fails leaves the
//! poller dirty and is retried on every later tick until it lands. Every
//! board change is also published to the advisory event channel.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use dispatch_core::{AdvisoryBoard, AdvisoryFeed, AdvisoryFeedSource, JsonFileStore, StoreError};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read advisory feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("advisory feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("advisory feed is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to persist advisories: {0}")]
    Store(#[from] StoreError),

    #[error("advisory store write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct AdvisoryPoller {
    source: AdvisoryFeedSource,
    http: reqwest::Client,
    board: Arc<RwLock<AdvisoryBoard>>,
    events: broadcast::Sender<AdvisoryFeed>,
    /// Flushed on a blocking thread; only this poller touches it.
    store: Arc<Mutex<JsonFileStore>>,
    /// The board holds lines the store does not have yet.
    dirty: bool,
}

impl AdvisoryPoller {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn new(
        source: AdvisoryFeedSource,
        board: Arc<RwLock<AdvisoryBoard>>,
        events: broadcast::Sender<AdvisoryFeed>,
        store: JsonFileStore,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            source,
            http,
            board,
            events,
            store: Arc::new(Mutex::new(store)),
            dirty: false,
        })
    }

    /// One scheduled tick. Failures are logged and leave the board as it was.
    pub async fn run(&mut self) {
        match self.poll_once().await {
            Ok(true) => tracing::debug!(source = %self.source, "advisory poll stored new lines"),
            Ok(false) => {}
            Err(e) => tracing::warn!(source = %self.source, error = %e, "advisory poll failed"),
        }
    }

    /// Reads the feed and ingests it. Returns `true` if the board changed.
    ///
    /// A pending write from an earlier tick is retried even when the feed
    /// itself cannot be read.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the feed cannot be read or parsed, or if
    /// the board cannot be persisted.
    pub async fn poll_once(&mut self) -> Result<bool, FeedError> {
        let feed = match self.read_feed().await {
            Ok(feed) => feed,
            Err(e) => {
                self.flush_if_dirty().await?;
                return Err(e);
            }
        };

        let changed = {
            let mut board = self.board.write().await;
            let changed = board.ingest(feed);
            if changed {
                self.publish(board.snapshot());
            }
            changed
        };

        self.dirty |= changed;
        self.flush_if_dirty().await?;
        Ok(changed)
    }

    fn publish(&self, snapshot: AdvisoryFeed) {
        match self.events.send(snapshot) {
            Ok(subscribers) => tracing::debug!(subscribers, "advisory update published"),
            Err(_) => tracing::debug!("no advisory subscribers; update not published"),
        }
    }

    async fn flush_if_dirty(&mut self) -> Result<(), FeedError> {
        if !self.dirty {
            return Ok(());
        }

        let snapshot = self.board.read().await.snapshot();
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
            store.set("summary", &snapshot.summary)?;
            store.set("advice", &snapshot.advice)
        })
        .await??;

        self.dirty = false;
        Ok(())
    }

    async fn read_feed(&self) -> Result<AdvisoryFeed, FeedError> {
        let body = match &self.source {
            AdvisoryFeedSource::File(path) => {
                tokio::fs::read(path).await.map_err(|source| FeedError::Io {
                    path: path.clone(),
                    source,
                })?
            }
            AdvisoryFeedSource::Url(url) => self
                .http
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec(),
        };
        serde_json::from_slice(&body).map_err(FeedError::Parse)
    }
}
