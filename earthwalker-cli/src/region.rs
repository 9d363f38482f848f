//! Region command implementation for the Earthwalker CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use earthwalker_core::region::geojson::option_region;
use earthwalker_core::{GeoJsonGeometry, MapSettings, Region, polygon_count};
use earthwalker_geocode::{
    CachedGeocoder, DEFAULT_BASE_URL, Geocoder, NominatimConfig, NominatimGeocoder,
    refresh_map_settings,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DRAWN, ARG_NOMINATIM_URL, ARG_PLACE, ARG_TIMEOUT_SECS, CliError, write_report};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI arguments for the `region` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "region",
    long_about = "Combine hand-drawn GeoJSON geometry files with the outlines \
                 of named places into one multi-polygon and report its area. \
                 Places without a polygon outline, or whose lookup fails, are \
                 skipped with a warning.",
    about = "Build a constraint region"
)]
#[ortho_config(prefix = "EARTHWALKER")]
pub(crate) struct RegionArgs {
    /// Place name to outline; repeat for several places.
    #[arg(long = ARG_PLACE, value_name = "name")]
    #[serde(default)]
    pub(crate) place: Vec<String>,
    /// GeoJSON geometry file with a drawn polygon; repeat for several files.
    #[arg(long = ARG_DRAWN, value_name = "path")]
    #[serde(default)]
    pub(crate) drawn: Vec<Utf8PathBuf>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Per-lookup timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl RegionArgs {
    pub(crate) fn into_config(self) -> Result<RegionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RegionConfig::from(merged))
    }
}

/// Resolved `region` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionConfig {
    pub(crate) places: Vec<String>,
    pub(crate) drawn: Vec<Utf8PathBuf>,
    pub(crate) nominatim_url: String,
    pub(crate) timeout: Duration,
}

impl From<RegionArgs> for RegionConfig {
    fn from(args: RegionArgs) -> Self {
        Self {
            places: args.place,
            drawn: args.drawn,
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: Duration::from_secs(args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Outcome of resolving one place name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PlaceReport {
    pub(crate) name: String,
    pub(crate) resolved: bool,
}

/// JSON report printed by `region`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RegionReport {
    #[serde(with = "option_region")]
    pub(crate) polygon: Option<Region>,
    pub(crate) polygon_count: usize,
    pub(crate) area: f64,
    pub(crate) places: Vec<PlaceReport>,
}

impl RegionReport {
    fn from_settings(settings: &MapSettings) -> Self {
        let places = settings
            .place_regions
            .names()
            .zip(settings.place_regions.regions())
            .map(|(name, region)| PlaceReport {
                name: name.to_owned(),
                resolved: region.is_some(),
            })
            .collect();
        Self {
            polygon: settings.polygon.clone(),
            polygon_count: polygon_count(settings.polygon.as_ref()),
            area: settings.area,
            places,
        }
    }
}

pub(crate) fn run_region(args: RegionArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let nominatim = NominatimConfig::new(config.nominatim_url.clone()).with_timeout(config.timeout);
    let geocoder = NominatimGeocoder::with_config(nominatim).map_err(|source| {
        CliError::BuildGeocoder {
            base_url: config.nominatim_url.clone(),
            source,
        }
    })?;
    let mut stdout = std::io::stdout().lock();
    run_region_with(&config, &CachedGeocoder::new(geocoder), &mut stdout)
}

pub(crate) fn run_region_with<G: Geocoder>(
    config: &RegionConfig,
    geocoder: &G,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let report = build_region(config, geocoder)?;
    write_report(writer, &report)
}

pub(crate) fn build_region<G: Geocoder>(
    config: &RegionConfig,
    geocoder: &G,
) -> Result<RegionReport, CliError> {
    let drawn_polygons = config
        .drawn
        .iter()
        .map(|path| load_drawn_region(path))
        .collect::<Result<Vec<_>, _>>()?;
    let mut settings = MapSettings {
        drawn_polygons,
        place_names: config.places.clone(),
        ..MapSettings::default()
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(refresh_map_settings(&mut settings, geocoder, config.timeout));
    Ok(RegionReport::from_settings(&settings))
}

/// Load a GeoJSON `Polygon` or `MultiPolygon` geometry object from disk.
pub(crate) fn load_drawn_region(path: &Utf8Path) -> Result<Region, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenDrawnRegion {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let geometry: GeoJsonGeometry = serde_json::from_reader(BufReader::new(file)).map_err(
        |source| CliError::ParseDrawnRegion {
            path: path.to_path_buf(),
            source,
        },
    )?;
    geometry
        .to_region()
        .map_err(|source| CliError::InvalidDrawnRegion {
            path: path.to_path_buf(),
            source,
        })
}
