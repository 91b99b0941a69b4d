//! Map marker bookkeeping for the facility panel.
//!
//! Markers are keyed by [`Facility::key`] so a refresh updates the layer in
//! place: markers for facilities that disappeared are removed, new facilities
//! get new markers, and surviving markers are relabeled when their rank moves.

use std::collections::HashMap;

use serde::Serialize;

use crate::facility::Facility;
use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: String,
    /// 1-based rank in the current list.
    pub label: usize,
    pub title: String,
    pub position: Coordinate,
}

/// Changes applied by one [`MarkerLayer::sync`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerDiff {
    pub added: Vec<Marker>,
    pub removed: Vec<String>,
    pub relabeled: Vec<Marker>,
    pub unchanged: usize,
}

impl MarkerDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.relabeled.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: HashMap<String, Marker>,
}

impl MarkerLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the layer in line with `facilities` (already ranked).
    pub fn sync(&mut self, facilities: &[Facility]) -> MarkerDiff {
        let mut diff = MarkerDiff::default();
        let mut next: HashMap<String, Marker> = HashMap::with_capacity(facilities.len());

        for (index, facility) in facilities.iter().enumerate() {
            let marker = Marker {
                key: facility.key.clone(),
                label: index + 1,
                title: facility.name.clone(),
                position: facility.position,
            };

            match self.markers.remove(&facility.key) {
                Some(existing) if existing == marker => diff.unchanged += 1,
                Some(_) => diff.relabeled.push(marker.clone()),
                None => diff.added.push(marker.clone()),
            }
            next.insert(marker.key.clone(), marker);
        }

        let mut removed: Vec<String> = self.markers.drain().map(|(key, _)| key).collect();
        removed.sort_unstable();
        diff.removed = removed;

        self.markers = next;
        tracing::debug!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            relabeled = diff.relabeled.len(),
            unchanged = diff.unchanged,
            "marker layer synced"
        );
        diff
    }

    /// Current markers ordered by label.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers: Vec<Marker> = self.markers.values().cloned().collect();
        markers.sort_by_key(|m| m.label);
        markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) -> Vec<String> {
        let mut removed: Vec<String> = self.markers.drain().map(|(key, _)| key).collect();
        removed.sort_unstable();
        removed
    }
}
