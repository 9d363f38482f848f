//! Core domain logic for the Earthwalker engine.
//!
//! Two independent pieces live here: the scoring engine, which turns a
//! guess and the true location into a score that decays with great-circle
//! distance, and region aggregation, which merges drawn and resolved
//! polygons into one constraint region and measures it. Map settings tie the
//! two together by deriving the play area a map is scored against.
//!
//! Everything in this crate is synchronous and free of I/O. Place-name
//! resolution lives in `earthwalker-geocode`.

#![forbid(unsafe_code)]

pub mod format;
pub mod location;
pub mod map;
pub mod region;
pub mod round;
pub mod score;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use format::format_distance;
pub use location::{GeoPoint, MAX_LATITUDE};
pub use map::{MapDefinition, MapSettings, MapSettingsDocument, PlaceRegion, PlaceRegions};
pub use region::geojson::{GeoJsonError, GeoJsonGeometry};
pub use region::{Region, combine_regions, polygon_count, region_area};
pub use round::{Guess, Place, RoundNumbered, order_rounds, score_rounds};
pub use score::{
    DECAY_BASE, EARTH_AREA, EARTH_AREA_SQRT, HALF_DISTANCE, MAX_SCORE, PlayArea, PointRole,
    ScoreError, ScoreResult, ScoringParams, score_distance, total_score,
};
