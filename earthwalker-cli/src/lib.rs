//! Command-line interface for the Earthwalker engine.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod logging;
mod region;
mod score;

pub use error::CliError;

use region::{RegionArgs, run_region};
use score::{ScoreArgs, run_score};

const ARG_GUESS_LAT: &str = "guess-lat";
const ARG_GUESS_LNG: &str = "guess-lng";
const ARG_ACTUAL_LAT: &str = "actual-lat";
const ARG_ACTUAL_LNG: &str = "actual-lng";
const ARG_GRACE_DISTANCE: &str = "grace-distance";
const ARG_AREA: &str = "area";
const ARG_PLACE: &str = "place";
const ARG_DRAWN: &str = "drawn";
const ARG_NOMINATIM_URL: &str = "nominatim-url";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ENV_GUESS_LAT: &str = "EARTHWALKER_CMDS_SCORE_GUESS_LAT";
const ENV_GUESS_LNG: &str = "EARTHWALKER_CMDS_SCORE_GUESS_LNG";
const ENV_ACTUAL_LAT: &str = "EARTHWALKER_CMDS_SCORE_ACTUAL_LAT";
const ENV_ACTUAL_LNG: &str = "EARTHWALKER_CMDS_SCORE_ACTUAL_LNG";

/// Run the Earthwalker CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, when a
/// drawn region cannot be read, or when the report cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init_logging()?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Region(args) => run_region(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "earthwalker",
    about = "Scoring and region tools for the Earthwalker geography game",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a guess against the true location.
    Score(ScoreArgs),
    /// Combine drawn polygons and named places into one region.
    Region(RegionArgs),
}

fn write_report<T: Serialize>(writer: &mut dyn Write, report: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
