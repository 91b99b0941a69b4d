//! HTTP client for the upstream place text-search endpoint.

use std::time::Duration;

use dispatch_core::Coordinate;
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::merge::{merge_by_place_id, MAX_MERGED_RESULTS};
use crate::types::{Place, TextSearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";

/// The two keyword searches behind the facility locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuery {
    EmergencyHospital,
    UrgentCare,
}

impl SearchQuery {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::EmergencyHospital => "emergency hospital trauma center",
            Self::UrgentCare => "urgent care emergency care",
        }
    }
}

/// Client for the place text-search API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("dispatch/0.1 (facility-locator)")
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs one text search centered on `center`.
    ///
    /// A response whose `status` is anything other than `"OK"` yields an
    /// empty list. The body is read even on a non-2xx HTTP status, since the
    /// upstream reports denied or invalid requests there too.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure, or on a non-2xx HTTP
    ///   status whose body is not a search envelope.
    /// - [`PlacesError::Deserialize`] if a 2xx body is not the expected shape.
    pub async fn text_search(
        &self,
        query: SearchQuery,
        center: Coordinate,
        radius: u32,
    ) -> Result<Vec<Place>, PlacesError> {
        let url = self.build_url(query.text(), center, radius)?;
        let response = self.client.get(url).send().await?;
        let http_status = response.status();
        let http_error = response.error_for_status_ref().err();
        let body = response.text().await?;

        let envelope: TextSearchResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(source) => {
                return Err(match http_error {
                    Some(e) => PlacesError::Http(e),
                    None => PlacesError::Deserialize {
                        context: format!("textsearch(query={})", query.text()),
                        source,
                    },
                });
            }
        };

        if !envelope.is_ok() {
            tracing::warn!(
                query = query.text(),
                http_status = http_status.as_u16(),
                status = %envelope.status,
                error_message = envelope.error_message.as_deref().unwrap_or(""),
                "place search returned non-OK status; treating as empty"
            );
            return Ok(Vec::new());
        }

        tracing::debug!(
            query = query.text(),
            count = envelope.results.len(),
            "place search succeeded"
        );
        Ok(envelope.results)
    }

    /// Runs the hospital and urgent-care searches concurrently and merges them.
    ///
    /// Hospital results come first; duplicates by place id are dropped and at
    /// most [`MAX_MERGED_RESULTS`] places are returned.
    ///
    /// # Errors
    ///
    /// Fails if either search fails at the HTTP or parse level.
    pub async fn search_emergency_facilities(
        &self,
        center: Coordinate,
        radius: u32,
    ) -> Result<Vec<Place>, PlacesError> {
        let (hospitals, urgent_care) = tokio::join!(
            self.text_search(SearchQuery::EmergencyHospital, center, radius),
            self.text_search(SearchQuery::UrgentCare, center, radius),
        );

        Ok(merge_by_place_id(
            [hospitals?, urgent_care?],
            MAX_MERGED_RESULTS,
        ))
    }

    fn build_url(&self, query: &str, center: Coordinate, radius: u32) -> Result<Url, PlacesError> {
        let mut url =
            self.base_url
                .join("textsearch/json")
                .map_err(|e| PlacesError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("location", &center.to_string())
            .append_pair("radius", &radius.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}
