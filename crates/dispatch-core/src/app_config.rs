use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;
use crate::facility::RankingConfig;
use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the advisory loop reads its feed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryFeedSource {
    File(PathBuf),
    Url(String),
}

impl AdvisoryFeedSource {
    /// `http://` and `https://` values are URLs; anything else is a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for AdvisoryFeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Upstream place-search credential. Requests fail with a server error when unset.
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    /// Point every distance is measured from.
    pub reference: Coordinate,
    /// Radius (meters) the facility panel searches with.
    pub search_radius: u32,
    pub eta_minutes_per_mile: f64,
    pub advisory_feed: AdvisoryFeedSource,
    pub advisory_poll_secs: u64,
    pub advisory_capacity: usize,
    /// Per-request timeout for an HTTP advisory feed. Kept below the poll interval.
    pub advisory_feed_timeout_secs: u64,
    pub advisory_store_path: PathBuf,
    /// Proxy requests allowed per minute before answering 429.
    pub proxy_rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn ranking(&self) -> RankingConfig {
        RankingConfig::new(self.reference, self.eta_minutes_per_mile)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no place-search key is configured.
    pub fn require_places_api_key(&self) -> Result<&str, ConfigError> {
        self.places_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_PLACES_API_KEY".to_string()))
    }

    #[must_use]
    pub fn advisory_poll_interval(&self) -> Duration {
        Duration::from_secs(self.advisory_poll_secs)
    }

    #[must_use]
    pub fn advisory_feed_timeout(&self) -> Duration {
        Duration::from_secs(self.advisory_feed_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("reference", &self.reference)
            .field("search_radius", &self.search_radius)
            .field("eta_minutes_per_mile", &self.eta_minutes_per_mile)
            .field("advisory_feed", &self.advisory_feed)
            .field("advisory_poll_secs", &self.advisory_poll_secs)
            .field("advisory_capacity", &self.advisory_capacity)
            .field(
                "advisory_feed_timeout_secs",
                &self.advisory_feed_timeout_secs,
            )
            .field("advisory_store_path", &self.advisory_store_path)
            .field(
                "proxy_rate_limit_per_minute",
                &self.proxy_rate_limit_per_minute,
            )
            .finish()
    }
}
