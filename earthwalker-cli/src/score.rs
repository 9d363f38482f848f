//! Score command implementation for the Earthwalker CLI.

use std::io::Write;

use clap::Parser;
use earthwalker_core::{GeoPoint, ScoreResult, ScoringParams, format_distance};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ACTUAL_LAT, ARG_ACTUAL_LNG, ARG_AREA, ARG_GRACE_DISTANCE, ARG_GUESS_LAT, ARG_GUESS_LNG,
    CliError, ENV_ACTUAL_LAT, ENV_ACTUAL_LNG, ENV_GUESS_LAT, ENV_GUESS_LNG, write_report,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Score a guess against the true location. The score decays \
                 with great-circle distance beyond the grace distance, halving \
                 faster on maps whose play area is smaller than the Earth.",
    about = "Score a single guess"
)]
#[ortho_config(prefix = "EARTHWALKER")]
pub(crate) struct ScoreArgs {
    /// Latitude of the guess in degrees.
    #[arg(long = ARG_GUESS_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) guess_lat: Option<f64>,
    /// Longitude of the guess in degrees.
    #[arg(long = ARG_GUESS_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) guess_lng: Option<f64>,
    /// Latitude of the true location in degrees.
    #[arg(long = ARG_ACTUAL_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) actual_lat: Option<f64>,
    /// Longitude of the true location in degrees.
    #[arg(long = ARG_ACTUAL_LNG, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) actual_lng: Option<f64>,
    /// Radius in metres inside which any guess scores the maximum.
    #[arg(long = ARG_GRACE_DISTANCE, value_name = "metres")]
    #[serde(default)]
    pub(crate) grace_distance: Option<f64>,
    /// Play area in square metres; zero or absent means the whole Earth.
    #[arg(long = ARG_AREA, value_name = "m2")]
    #[serde(default)]
    pub(crate) area: Option<f64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreConfig {
    pub(crate) guess: GeoPoint,
    pub(crate) actual: GeoPoint,
    pub(crate) params: ScoringParams,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let guess_lat = require(args.guess_lat, ARG_GUESS_LAT, ENV_GUESS_LAT)?;
        let guess_lng = require(args.guess_lng, ARG_GUESS_LNG, ENV_GUESS_LNG)?;
        let actual_lat = require(args.actual_lat, ARG_ACTUAL_LAT, ENV_ACTUAL_LAT)?;
        let actual_lng = require(args.actual_lng, ARG_ACTUAL_LNG, ENV_ACTUAL_LNG)?;
        let params = ScoringParams::new(
            args.grace_distance.unwrap_or_default(),
            args.area.unwrap_or_default(),
        )?;
        Ok(Self {
            guess: GeoPoint::new(guess_lat, guess_lng),
            actual: GeoPoint::new(actual_lat, actual_lng),
            params,
        })
    }
}

fn require(value: Option<f64>, field: &'static str, env: &'static str) -> Result<f64, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// JSON report printed by `score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ScoreReport {
    pub(crate) score: u32,
    pub(crate) distance_metres: Option<f64>,
    pub(crate) distance: Option<String>,
}

impl From<ScoreResult> for ScoreReport {
    fn from(result: ScoreResult) -> Self {
        Self {
            score: result.score,
            distance_metres: result.distance_metres,
            distance: result.distance_metres.map(format_distance),
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let config = args.into_config()?;
    run_score_with(&config, &mut stdout)
}

pub(crate) fn run_score_with(config: &ScoreConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let result = config.params.score(&config.guess, &config.actual)?;
    log::debug!(
        "scored guess {} against {}: {}",
        config.guess,
        config.actual,
        result.score
    );
    write_report(writer, &ScoreReport::from(result))
}
