//! Geographic points and great-circle distance.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius.
//! The game never projects coordinates, so no other model is offered.

use std::fmt;

use geo::{Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// Largest latitude magnitude a valid point may carry.
pub const MAX_LATITUDE: f64 = 90.0;

/// A WGS84 position as exchanged with the game backend.
///
/// Field names follow the backend encoding, `{"Lat": .., "Lng": ..}`.
///
/// # Examples
///
/// ```
/// use earthwalker_core::GeoPoint;
///
/// let paris = GeoPoint::new(48.8566, 2.3522);
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let metres = paris.distance_to(&london);
/// assert!((343_000.0..345_000.0).contains(&metres));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    #[serde(rename = "Lat")]
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(rename = "Lng")]
    pub lng: f64,
}

impl GeoPoint {
    /// Construct a point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Report whether the latitude lies within `[-90, 90]`.
    ///
    /// Out-of-range latitudes mark a guess that was never placed on the map.
    #[must_use]
    pub fn has_valid_latitude(&self) -> bool {
        self.lat.abs() <= MAX_LATITUDE
    }

    /// Report whether both ordinates are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        Haversine.distance(Point::from(*self), Point::from(*other))
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        Self::new(point.lng, point.lat)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(point: GeoPoint) -> Self {
        Self {
            x: point.lng,
            y: point.lat,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }
}
