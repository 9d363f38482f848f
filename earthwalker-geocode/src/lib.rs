//! Place-name resolution for Earthwalker map regions.
//!
//! A [`Geocoder`] turns free text into ranked candidates. The Nominatim
//! adapter talks to a real service; [`CachedGeocoder`] keeps successful
//! answers for the life of an editing session. [`resolve_place_name`] picks
//! the first polygonal outline and never fails loudly, and
//! [`update_place_regions`] fans out one lookup per uncached name before
//! rebuilding the session's name cache.

#![forbid(unsafe_code)]

mod error;
mod geocoder;
mod nominatim;
mod resolve;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{GeocodeError, GeocoderBuildError};
pub use geocoder::{CachedGeocoder, GeocodeCandidate, Geocoder};
pub use nominatim::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, NominatimConfig, NominatimGeocoder};
pub use resolve::{
    DEFAULT_LOOKUP_TIMEOUT, load_map_settings, refresh_map_settings, resolve_place_name,
    select_region, update_place_regions,
};
