pub mod advisory;
pub mod app_config;
pub mod config;
pub mod facility;
pub mod geo;
pub mod hotlines;
pub mod markers;
pub mod panel;
pub mod report;
pub mod seed;
pub mod store;

pub use advisory::{AdvisoryBoard, AdvisoryFeed, AdvisoryLog};
pub use app_config::{AdvisoryFeedSource, AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use facility::{rank_facilities, Facility, FacilityCategory, RankingConfig, RawFacility};
pub use geo::{eta_minutes, haversine_miles, Coordinate, EARTH_RADIUS_MILES};
pub use hotlines::{hotlines, Hotline};
pub use markers::{Marker, MarkerDiff, MarkerLayer};
pub use panel::{FacilityPanel, PanelSource, RefreshOutcome, RefreshTicket};
pub use report::CallReport;
pub use seed::{seed_facilities, seed_facilities_for, SEED_REFERENCE};
pub use store::{JsonFileStore, StoreError};
