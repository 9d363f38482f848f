//! Facade crate for the Earthwalker engine.
//!
//! This crate re-exports the scoring and region types and exposes place-name
//! geocoding behind the `geocode` feature.

#![forbid(unsafe_code)]

pub use earthwalker_core::{
    GeoJsonError, GeoJsonGeometry, GeoPoint, Guess, MAX_SCORE, MapDefinition, MapSettings,
    MapSettingsDocument, Place, PlaceRegion, PlaceRegions, PlayArea, Region, RoundNumbered,
    ScoreError, ScoreResult, ScoringParams, combine_regions, format_distance, order_rounds,
    polygon_count, region_area, score_distance, score_rounds, total_score,
};

#[cfg(feature = "geocode")]
pub use earthwalker_geocode::{
    CachedGeocoder, GeocodeCandidate, GeocodeError, Geocoder, NominatimConfig, NominatimGeocoder,
    load_map_settings, refresh_map_settings, resolve_place_name, update_place_regions,
};
