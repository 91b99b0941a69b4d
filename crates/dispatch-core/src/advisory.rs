//! Accumulated AI summary and advice lines for the current call.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

pub const DEFAULT_ADVISORY_CAPACITY: usize = 200;

/// One poll of the advisory feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryFeed {
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
}

/// Newest-first list of unique strings with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct AdvisoryLog {
    items: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl AdvisoryLog {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "advisory capacity must be non-zero");
        Self {
            items: VecDeque::new(),
            seen: HashSet::new(),
            capacity,
        }
    }

    /// Prepends every unseen item from `batch` as one block, keeping the
    /// batch's own order. Returns how many were added.
    pub fn ingest<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let fresh: Vec<String> = batch
            .into_iter()
            .filter(|item| self.seen.insert(item.clone()))
            .collect();

        let added = fresh.len();
        for item in fresh.into_iter().rev() {
            self.items.push_front(item);
        }

        while self.items.len() > self.capacity {
            if let Some(evicted) = self.items.pop_back() {
                self.seen.remove(&evicted);
            }
        }

        added
    }

    /// Items newest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AdvisoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ADVISORY_CAPACITY)
    }
}

/// The two advisory streams shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryBoard {
    pub summary: AdvisoryLog,
    pub advice: AdvisoryLog,
}

impl AdvisoryBoard {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            summary: AdvisoryLog::with_capacity(capacity),
            advice: AdvisoryLog::with_capacity(capacity),
        }
    }

    /// Folds one feed poll into both logs. Returns `true` if anything changed.
    pub fn ingest(&mut self, feed: AdvisoryFeed) -> bool {
        let summary_added = self.summary.ingest(feed.summary);
        let advice_added = self.advice.ingest(feed.advice);
        if summary_added + advice_added > 0 {
            tracing::debug!(summary_added, advice_added, "advisory board updated");
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> AdvisoryFeed {
        AdvisoryFeed {
            summary: self.summary.to_vec(),
            advice: self.advice.to_vec(),
        }
    }
}
