//! GeoJSON geometry encoding for [`Region`] values.
//!
//! Regions travel as bare GeoJSON geometry objects
//! (`{"type": "MultiPolygon", "coordinates": [...]}`). Decoding accepts
//! `Polygon` and `MultiPolygon` in any letter case and wraps a bare polygon
//! as a one-element multi-polygon. Rings are passed through unvalidated.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::Region;

/// Ordinates of a single position, `[longitude, latitude, ..]`.
type Position = Vec<f64>;
type Ring = Vec<Position>;
type PolygonCoordinates = Vec<Ring>;

/// Errors raised while decoding GeoJSON geometry into a [`Region`].
#[derive(Debug, Error)]
pub enum GeoJsonError {
    /// The geometry type is neither `Polygon` nor `MultiPolygon`.
    #[error("geometry type {kind:?} is not polygonal")]
    NotPolygonal {
        /// Geometry type as supplied.
        kind: String,
    },
    /// The coordinate array did not match the nesting of its geometry type.
    #[error("malformed {kind} coordinates")]
    Coordinates {
        /// Geometry type whose coordinates failed to decode.
        kind: &'static str,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A position carried fewer than two ordinates.
    #[error("position has {len} ordinates; at least two are required")]
    ShortPosition {
        /// Number of ordinates found.
        len: usize,
    },
}

/// An undecoded GeoJSON geometry object.
///
/// The coordinate payload is kept raw so that non-polygonal geometries (for
/// example the `Point` results a geocoder returns for small places) can be
/// recognised and skipped without failing deserialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonGeometry {
    /// GeoJSON geometry type, e.g. `"Polygon"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Coordinate array in GeoJSON nesting for `kind`.
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl GeoJsonGeometry {
    /// Report whether the geometry is a polygon or multi-polygon.
    #[must_use]
    pub fn is_polygonal(&self) -> bool {
        self.kind.eq_ignore_ascii_case("polygon") || self.kind.eq_ignore_ascii_case("multipolygon")
    }

    /// Decode the geometry into a multi-polygon region.
    ///
    /// # Errors
    ///
    /// Returns [`GeoJsonError::NotPolygonal`] for other geometry types and
    /// the coordinate errors of [`GeoJsonError`] for malformed payloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use earthwalker_core::region::geojson::GeoJsonGeometry;
    ///
    /// let geometry: GeoJsonGeometry = serde_json::from_str(
    ///     r#"{"type":"polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
    /// )?;
    /// let region = geometry.to_region()?;
    /// assert_eq!(region.0.len(), 1);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_region(&self) -> Result<Region, GeoJsonError> {
        if self.kind.eq_ignore_ascii_case("multipolygon") {
            let polygons: Vec<PolygonCoordinates> =
                decode_coordinates(&self.coordinates, "MultiPolygon")?;
            let decoded = polygons
                .iter()
                .map(|rings| decode_polygon(rings))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(MultiPolygon::new(decoded));
        }
        if self.kind.eq_ignore_ascii_case("polygon") {
            let rings: PolygonCoordinates = decode_coordinates(&self.coordinates, "Polygon")?;
            return Ok(MultiPolygon::new(vec![decode_polygon(&rings)?]));
        }
        Err(GeoJsonError::NotPolygonal {
            kind: self.kind.clone(),
        })
    }

    /// Encode a region as a `MultiPolygon` geometry.
    #[must_use]
    pub fn from_region(region: &Region) -> Self {
        Self {
            kind: "MultiPolygon".to_owned(),
            coordinates: region.0.iter().map(encode_polygon).collect(),
        }
    }
}

fn decode_coordinates<T>(value: &serde_json::Value, kind: &'static str) -> Result<T, GeoJsonError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value).map_err(|source| GeoJsonError::Coordinates { kind, source })
}

fn decode_polygon(rings: &[Ring]) -> Result<Polygon<f64>, GeoJsonError> {
    let mut decoded = rings
        .iter()
        .map(|ring| decode_ring(ring))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let exterior = decoded.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Ok(Polygon::new(exterior, decoded.collect()))
}

fn decode_ring(ring: &[Position]) -> Result<LineString<f64>, GeoJsonError> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(GeoJsonError::ShortPosition {
                len: position.len(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn encode_polygon(polygon: &Polygon<f64>) -> serde_json::Value {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| {
            ring.coords()
                .map(|coord| serde_json::Value::from(vec![coord.x, coord.y]))
                .collect::<serde_json::Value>()
        })
        .collect()
}

/// Serde adapter encoding a [`Region`] as GeoJSON geometry.
///
/// Use with `#[serde(with = "earthwalker_core::region::geojson::region")]`.
pub mod region {
    use super::{Deserialize, Deserializer, GeoJsonGeometry, Region, Serialize, Serializer};

    /// Serialise `value` as a `MultiPolygon` geometry.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Region, serializer: S) -> Result<S::Ok, S::Error> {
        GeoJsonGeometry::from_region(value).serialize(serializer)
    }

    /// Deserialise a `Polygon` or `MultiPolygon` geometry.
    ///
    /// # Errors
    ///
    /// Fails for non-polygonal or malformed geometry.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Region, D::Error> {
        GeoJsonGeometry::deserialize(deserializer)?
            .to_region()
            .map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<Region>`, encoding `None` as `null`.
pub mod option_region {
    use super::{Deserialize, Deserializer, GeoJsonGeometry, Region, Serialize, Serializer};

    /// Serialise an optional region.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<Region>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .as_ref()
            .map(GeoJsonGeometry::from_region)
            .serialize(serializer)
    }

    /// Deserialise an optional region.
    ///
    /// # Errors
    ///
    /// Fails for non-polygonal or malformed geometry.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Region>, D::Error> {
        Option::<GeoJsonGeometry>::deserialize(deserializer)?
            .map(|geometry| geometry.to_region())
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Vec<Region>`.
pub mod region_list {
    use super::{Deserialize, Deserializer, GeoJsonGeometry, Region, Serialize, Serializer};

    /// Serialise a list of regions.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &[Region], serializer: S) -> Result<S::Ok, S::Error> {
        value
            .iter()
            .map(GeoJsonGeometry::from_region)
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    /// Deserialise a list of regions.
    ///
    /// # Errors
    ///
    /// Fails when any entry is non-polygonal or malformed.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Region>, D::Error> {
        Vec::<GeoJsonGeometry>::deserialize(deserializer)?
            .iter()
            .map(GeoJsonGeometry::to_region)
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)
    }
}
