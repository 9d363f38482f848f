//! HTTP [`Geocoder`] backed by the Nominatim search API.
//!
//! Requests take the form
//! `GET {base_url}/search?q=..&polygon_geojson=1&limit=..&polygon_threshold=..&format=json`
//! and the response is a JSON array of candidates whose `geojson` member
//! carries the place outline.
//!
//! # Example
//!
//! ```no_run
//! use earthwalker_geocode::{Geocoder, NominatimGeocoder};
//!
//! let geocoder = NominatimGeocoder::new("https://nominatim.openstreetmap.org")?;
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()?;
//! let candidates = runtime.block_on(geocoder.search("Iceland"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{GeocodeCandidate, GeocodeError, Geocoder, GeocoderBuildError};

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for Nominatim requests.
pub const DEFAULT_USER_AGENT: &str = "earthwalker-geocode/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of candidates requested per search.
const DEFAULT_LIMIT: u32 = 5;

/// Default outline simplification tolerance in degrees.
const DEFAULT_POLYGON_THRESHOLD: f64 = 0.005;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct NominatimConfig {
    /// Base URL of the service (e.g., `"https://nominatim.openstreetmap.org"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Maximum number of candidates per search.
    pub limit: u32,
    /// Outline simplification tolerance in degrees.
    pub polygon_threshold: f64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            limit: DEFAULT_LIMIT,
            polygon_threshold: DEFAULT_POLYGON_THRESHOLD,
        }
    }
}

impl NominatimConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum number of candidates per search.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the outline simplification tolerance.
    #[must_use]
    pub const fn with_polygon_threshold(mut self, threshold: f64) -> Self {
        self.polygon_threshold = threshold;
        self
    }
}

/// Nominatim search client.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
    endpoint: Url,
}

impl NominatimGeocoder {
    /// Create a geocoder with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocoderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, GeocoderBuildError> {
        let raw = format!("{}/search", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|source| GeocoderBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(GeocoderBuildError::HttpClient)?;
        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("polygon_geojson", "1")
            .append_pair("limit", &self.config.limit.to_string())
            .append_pair(
                "polygon_threshold",
                &self.config.polygon_threshold.to_string(),
            )
            .append_pair("format", "json");
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocodeError {
        if error.is_timeout() {
            return GeocodeError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocodeError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        GeocodeError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = self.search_url(query);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url.as_str()))?;

        response
            .json::<Vec<GeocodeCandidate>>()
            .await
            .map_err(|err| GeocodeError::Parse {
                url: url.to_string(),
                message: err.to_string(),
            })
    }
}
