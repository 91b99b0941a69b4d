//! Facility panel state.
//!
//! The panel starts from the seed list and accepts at most one live result
//! per mount. Every mount bumps a generation counter; a fetch result carries
//! the [`RefreshTicket`] it was started with and is dropped if the panel has
//! been remounted or closed in the meantime, or if a result for that mount
//! was already applied.

use serde::Serialize;

use crate::facility::{rank_facilities, Facility, RankingConfig, RawFacility};
use crate::markers::{MarkerDiff, MarkerLayer};
use crate::seed::seed_facilities_for;

/// Facilities shown in the panel body.
pub const DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelSource {
    Seeded,
    Live,
}

/// Proof that a fetch was started for a particular mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Live data replaced the current list.
    Applied { count: usize, markers: MarkerDiff },
    /// The fetch failed or came back empty; the current list stays.
    Kept,
    /// The ticket belongs to an earlier mount, or this mount already took a result.
    Stale,
}

#[derive(Debug)]
pub struct FacilityPanel {
    config: RankingConfig,
    source: PanelSource,
    facilities: Vec<Facility>,
    markers: MarkerLayer,
    generation: u64,
    open: bool,
    /// Set once a result for the current generation has been applied.
    settled: bool,
}

impl FacilityPanel {
    /// Creates a panel already mounted with the seed list.
    #[must_use]
    pub fn new(config: RankingConfig) -> Self {
        let mut panel = Self {
            config,
            source: PanelSource::Seeded,
            facilities: Vec::new(),
            markers: MarkerLayer::new(),
            generation: 0,
            open: false,
            settled: false,
        };
        panel.mount();
        panel
    }

    /// Installs the seed list and returns a ticket for the live fetch.
    pub fn mount(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.open = true;
        self.settled = false;
        self.source = PanelSource::Seeded;
        self.facilities = seed_facilities_for(&self.config);
        self.markers.sync(&self.facilities);
        tracing::debug!(generation = self.generation, "facility panel mounted");
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// Tears the panel down; any in-flight fetch result becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.open = false;
        self.markers.clear();
    }

    /// Applies a fetch result started with `ticket`.
    ///
    /// The fetch error type is irrelevant here: every failure keeps the
    /// current list. Only the first result for a mount counts; later ones
    /// come back [`RefreshOutcome::Stale`].
    pub fn apply<E>(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<RawFacility>, E>,
    ) -> RefreshOutcome {
        if !self.open || self.settled || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                settled = self.settled,
                "discarding stale facility refresh"
            );
            return RefreshOutcome::Stale;
        }
        self.settled = true;

        let raw = match result {
            Ok(raw) if !raw.is_empty() => raw,
            Ok(_) => {
                tracing::info!("live facility search returned no results; keeping current list");
                return RefreshOutcome::Kept;
            }
            Err(_) => return RefreshOutcome::Kept,
        };

        self.facilities = rank_facilities(raw, &self.config);
        self.source = PanelSource::Live;
        let markers = self.markers.sync(&self.facilities);
        RefreshOutcome::Applied {
            count: self.facilities.len(),
            markers,
        }
    }

    #[must_use]
    pub fn source(&self) -> PanelSource {
        self.source
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Every ranked facility (at most eight).
    #[must_use]
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// The slice rendered in the panel body.
    #[must_use]
    pub fn display(&self) -> &[Facility] {
        let end = self.facilities.len().min(DISPLAY_LIMIT);
        &self.facilities[..end]
    }

    #[must_use]
    pub fn nearest(&self) -> Option<&Facility> {
        self.facilities.first()
    }

    #[must_use]
    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_facilities;
    use crate::geo::Coordinate;

    fn config() -> RankingConfig {
        RankingConfig::new(Coordinate::new(37.8715, -122.2730), 2.0)
    }

    fn live_places(count: usize) -> Vec<RawFacility> {
        (0..count)
            .map(|i| RawFacility {
                place_id: Some(format!("live-{i}")),
                name: format!("Live Hospital {i}"),
                // Reverse order so ranking has to sort.
                position: Coordinate::new(37.8715 - 0.01 * (count - i) as f64, -122.2730),
                address: None,
                rating: Some(4.0),
            })
            .collect()
    }

    #[test]
    fn new_panel_shows_seed_data() {
        let panel = FacilityPanel::new(config());
        assert_eq!(panel.source(), PanelSource::Seeded);
        assert_eq!(panel.facilities(), seed_facilities().as_slice());
        assert_eq!(panel.display().len(), 5);
        assert_eq!(panel.markers().len(), 5);
    }

    #[test]
    fn live_result_replaces_seed_sorted_and_truncated() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();

        let outcome = panel.apply::<()>(ticket, Ok(live_places(10)));

        assert!(matches!(outcome, RefreshOutcome::Applied { count: 8, .. }));
        assert_eq!(panel.source(), PanelSource::Live);
        assert_eq!(panel.facilities().len(), 8);
        assert_eq!(panel.display().len(), DISPLAY_LIMIT);
        assert_eq!(panel.facilities()[0].key, "live-9");
        assert!(panel
            .facilities()
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
        let labels: Vec<usize> = panel.markers().markers().iter().map(|m| m.label).collect();
        assert_eq!(labels, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn failed_fetch_keeps_previous_list() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();
        let before = panel.facilities().to_vec();

        let outcome = panel.apply(ticket, Err("network down"));

        assert_eq!(outcome, RefreshOutcome::Kept);
        assert_eq!(panel.facilities(), before.as_slice());
        assert_eq!(panel.source(), PanelSource::Seeded);
    }

    #[test]
    fn empty_result_keeps_previous_list() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();

        let outcome = panel.apply::<()>(ticket, Ok(Vec::new()));

        assert_eq!(outcome, RefreshOutcome::Kept);
        assert_eq!(panel.source(), PanelSource::Seeded);
        assert_eq!(panel.facilities().len(), 5);
    }

    #[test]
    fn second_result_for_same_mount_is_discarded() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();
        panel.apply::<()>(ticket, Ok(live_places(3)));
        let live = panel.facilities().to_vec();

        let replacement = vec![RawFacility {
            place_id: Some("second".into()),
            name: "Second Hospital".into(),
            position: Coordinate::new(37.87, -122.27),
            address: None,
            rating: None,
        }];
        assert_eq!(
            panel.apply::<()>(ticket, Ok(replacement)),
            RefreshOutcome::Stale
        );
        assert_eq!(panel.apply(ticket, Err(())), RefreshOutcome::Stale);
        assert_eq!(panel.facilities(), live.as_slice());
        assert_eq!(panel.source(), PanelSource::Live);
    }

    #[test]
    fn failed_fetch_settles_the_mount() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();

        assert_eq!(panel.apply(ticket, Err("timeout")), RefreshOutcome::Kept);
        assert_eq!(
            panel.apply::<()>(ticket, Ok(live_places(3))),
            RefreshOutcome::Stale
        );
        assert_eq!(panel.source(), PanelSource::Seeded);

        let next = panel.mount();
        assert!(matches!(
            panel.apply::<()>(next, Ok(live_places(3))),
            RefreshOutcome::Applied { count: 3, .. }
        ));
    }

    #[test]
    fn moved_reference_remeasures_seed() {
        let oakland = RankingConfig::new(Coordinate::new(37.7990, -122.2312), 2.0);
        let panel = FacilityPanel::new(oakland);

        let highland = panel
            .facilities()
            .iter()
            .find(|f| f.key == "seed-highland")
            .expect("highland seeded");
        assert!(highland.distance_miles < 0.01);
        assert_eq!(highland.eta_minutes, 0);
        assert_eq!(panel.nearest().map(|f| f.key.as_str()), Some("seed-highland"));
    }

    #[test]
    fn result_from_previous_mount_is_discarded() {
        let mut panel = FacilityPanel::new(config());
        let old = panel.mount();
        let current = panel.mount();
        assert_ne!(old, current);

        assert_eq!(
            panel.apply::<()>(old, Ok(live_places(3))),
            RefreshOutcome::Stale
        );
        assert_eq!(panel.source(), PanelSource::Seeded);
    }

    #[test]
    fn result_after_close_is_discarded() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();
        panel.close();

        assert_eq!(
            panel.apply::<()>(ticket, Ok(live_places(3))),
            RefreshOutcome::Stale
        );
        assert!(!panel.is_open());
        assert!(panel.markers().is_empty());
    }

    #[test]
    fn remount_restores_seed_after_live() {
        let mut panel = FacilityPanel::new(config());
        let ticket = panel.mount();
        panel.apply::<()>(ticket, Ok(live_places(3)));

        panel.mount();

        assert_eq!(panel.source(), PanelSource::Seeded);
        assert_eq!(panel.facilities(), seed_facilities().as_slice());
        assert_eq!(panel.markers().len(), 5);
    }
}
