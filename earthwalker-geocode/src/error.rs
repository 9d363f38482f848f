//! Error types produced while geocoding place names.

use thiserror::Error;

/// Failures of a single geocoder lookup.
///
/// Lookups are best-effort: [`crate::resolve_place_name`] logs these and
/// treats them as "no polygon found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GeocodeError {
    /// The service answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error description.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs} s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The response body was not a candidate list.
    #[error("failed to parse response from {url}: {message}")]
    Parse {
        /// Fully qualified request URL.
        url: String,
        /// Error description.
        message: String,
    },
}

/// Failures while constructing a [`crate::NominatimGeocoder`].
#[derive(Debug, Error)]
pub enum GeocoderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL does not parse.
    #[error("invalid geocoder base URL {url:?}: {source}")]
    BaseUrl {
        /// Base URL as configured.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}
