//! Constraint regions and their surface area.
//!
//! A [`Region`] is a multi-polygon of WGS84 coordinates (`x = longitude`,
//! `y = latitude`). Regions from different sources are merged by
//! concatenating their polygons: overlapping or duplicated polygons are kept
//! verbatim and their areas are counted once per polygon. Map areas stored by
//! the backend were computed this way, so the behaviour is part of the
//! scoring contract rather than an approximation of a geometric union.

pub mod geojson;

use geo::{ChamberlainDuquetteArea, MultiPolygon};

/// A multi-polygon constraint region.
pub type Region = MultiPolygon<f64>;

/// Merge regions into one multi-polygon, skipping absent entries.
///
/// The first present region is cloned as the accumulator and the polygons of
/// every later region are appended to it in order. Returns `None` when no
/// region is present.
///
/// # Examples
///
/// ```
/// use geo::{MultiPolygon, polygon};
/// use earthwalker_core::{Region, combine_regions};
///
/// let square: Region = MultiPolygon::new(vec![polygon![
///     (x: 0.0, y: 0.0),
///     (x: 1.0, y: 0.0),
///     (x: 1.0, y: 1.0),
///     (x: 0.0, y: 1.0),
/// ]]);
/// let combined = combine_regions([None, Some(&square), None, Some(&square)])
///     .expect("two regions were present");
/// assert_eq!(combined.0.len(), 2);
/// assert!(combine_regions([None, None]).is_none());
/// ```
pub fn combine_regions<'a, I>(regions: I) -> Option<Region>
where
    I: IntoIterator<Item = Option<&'a Region>>,
{
    regions
        .into_iter()
        .flatten()
        .fold(None, |combined: Option<Region>, region| match combined {
            None => Some(region.clone()),
            Some(mut accumulator) => {
                accumulator.0.extend(region.0.iter().cloned());
                Some(accumulator)
            }
        })
}

/// Unsigned spherical surface area of `region` in square metres.
///
/// Absent regions have zero area. Each polygon contributes its exterior area
/// less its holes; overlapping polygons are not deduplicated.
#[must_use]
pub fn region_area(region: Option<&Region>) -> f64 {
    region.map_or(0.0, |multi| multi.chamberlain_duquette_unsigned_area())
}

/// Number of polygons in `region`, zero when absent.
#[must_use]
pub fn polygon_count(region: Option<&Region>) -> usize {
    region.map_or(0, |multi| multi.0.len())
}
