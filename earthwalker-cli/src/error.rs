//! Error types emitted by the Earthwalker CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use earthwalker_core::{GeoJsonError, ScoreError};
use earthwalker_geocode::GeocoderBuildError;
use thiserror::Error;

/// Errors emitted by the Earthwalker CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] tracing_subscriber::util::TryInitError),
    /// Building the async runtime failed.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Scoring inputs violated the scoring contract.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// Opening a drawn region file failed.
    #[error("failed to open drawn region at {path:?}: {source}")]
    OpenDrawnRegion {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A drawn region file did not hold a GeoJSON geometry object.
    #[error("failed to parse drawn region JSON at {path:?}: {source}")]
    ParseDrawnRegion {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A drawn region file held a non-polygonal or malformed geometry.
    #[error("drawn region in {path:?} is not usable: {source}")]
    InvalidDrawnRegion {
        path: Utf8PathBuf,
        #[source]
        source: GeoJsonError,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: GeocoderBuildError,
    },
    /// Serialising a report failed.
    #[error("failed to serialise report: {0}")]
    SerialiseReport(#[source] serde_json::Error),
    /// Writing a report failed.
    #[error("failed to write report: {0}")]
    WriteOutput(#[source] std::io::Error),
}
