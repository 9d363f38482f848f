//! Region fixtures shared by unit and behaviour tests.

use geo::{LineString, MultiPolygon, Polygon};

use crate::Region;

/// A one-degree square region whose south-west corner is at (`lng`, `lat`).
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "fixture corners are offsets from the origin"
)]
pub fn degree_square(lng: f64, lat: f64) -> Region {
    let ring = LineString::from(vec![
        (lng, lat),
        (lng + 1.0, lat),
        (lng + 1.0, lat + 1.0),
        (lng, lat + 1.0),
        (lng, lat),
    ]);
    MultiPolygon::new(vec![Polygon::new(ring, Vec::new())])
}

/// A one-degree square at the origin with a quarter-degree hole.
#[must_use]
pub fn ring_with_hole() -> Region {
    let exterior = LineString::from(vec![
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (0.0, 0.0),
    ]);
    let hole = LineString::from(vec![
        (0.25, 0.25),
        (0.5, 0.25),
        (0.5, 0.5),
        (0.25, 0.5),
        (0.25, 0.25),
    ]);
    MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])])
}
