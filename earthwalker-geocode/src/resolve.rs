//! Resolve place names into regions.
//!
//! Resolution is soft-fail: a failed, timed-out or polygon-less lookup is
//! logged and yields `None`, so one bad name never prevents the others from
//! contributing their outlines.

use std::time::Duration;

use earthwalker_core::{GeoJsonError, MapSettings, MapSettingsDocument, PlaceRegions, Region};
use futures_util::future::join_all;

use crate::{GeocodeCandidate, Geocoder};

/// Per-lookup timeout used when callers have no preference.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Pick the outline of the first polygonal candidate.
///
/// Candidates without an outline or with a non-polygonal one (such as the
/// `Point` returned for a small village) are skipped. Later polygonal
/// candidates are not consulted once one is found.
///
/// # Errors
///
/// Returns [`GeoJsonError`] when the first polygonal outline is malformed.
pub fn select_region(candidates: &[GeocodeCandidate]) -> Result<Option<Region>, GeoJsonError> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.geojson.as_ref())
        .find(|geometry| geometry.is_polygonal())
        .map(|geometry| geometry.to_region())
        .transpose()
}

/// Look up `name` and return the outline of its first polygonal match.
///
/// Blank names resolve to `None` without a lookup. Lookups exceeding
/// `timeout` are abandoned.
pub async fn resolve_place_name<G>(geocoder: &G, name: &str, timeout: Duration) -> Option<Region>
where
    G: Geocoder + ?Sized,
{
    if name.trim().is_empty() {
        return None;
    }
    let candidates = match tokio::time::timeout(timeout, geocoder.search(name)).await {
        Ok(Ok(candidates)) => candidates,
        Ok(Err(err)) => {
            log::warn!("geocoding {name:?} failed: {err}");
            return None;
        }
        Err(_) => {
            log::warn!("geocoding {name:?} timed out after {timeout:?}");
            return None;
        }
    };
    match select_region(&candidates) {
        Ok(Some(region)) => Some(region),
        Ok(None) => {
            log::debug!(
                "no polygon among {} candidates for {name:?}",
                candidates.len()
            );
            None
        }
        Err(err) => {
            log::warn!("discarding malformed outline for {name:?}: {err}");
            None
        }
    }
}

/// Bring `regions` in line with `names`.
///
/// Names already cached are reused. The remaining names are looked up
/// concurrently and the cache is rebuilt only once every lookup has
/// finished, so its keys end up exactly matching `names`.
pub async fn update_place_regions<G>(
    regions: &mut PlaceRegions,
    names: &[String],
    geocoder: &G,
    timeout: Duration,
) where
    G: Geocoder + ?Sized,
{
    let missing = regions.missing_names(names);
    if !missing.is_empty() {
        log::debug!("resolving {} place names", missing.len());
    }
    let resolved = join_all(
        missing
            .iter()
            .map(|name| resolve_place_name(geocoder, name, timeout)),
    )
    .await;
    *regions = std::mem::take(regions).rebuild(names, missing.into_iter().zip(resolved));
}

/// Re-resolve place names and recompute every derived field of `settings`.
pub async fn refresh_map_settings<G>(settings: &mut MapSettings, geocoder: &G, timeout: Duration)
where
    G: Geocoder + ?Sized,
{
    update_place_regions(
        &mut settings.place_regions,
        &settings.place_names,
        geocoder,
        timeout,
    )
    .await;
    settings.update_polygon();
    settings.update_time_limit();
}

/// Restore settings from an editor document with its place names resolved.
pub async fn load_map_settings<G>(
    document: MapSettingsDocument,
    geocoder: &G,
    timeout: Duration,
) -> MapSettings
where
    G: Geocoder + ?Sized,
{
    let mut settings = MapSettings::from_document(document);
    refresh_map_settings(&mut settings, geocoder, timeout).await;
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeocodeError;
    use crate::test_support::{StubGeocoder, block_on_for_tests, point_candidate};
    use earthwalker_core::test_support::degree_square;
    use earthwalker_core::{GeoJsonGeometry, polygon_count};
    use rstest::{fixture, rstest};
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[fixture]
    fn stub() -> StubGeocoder {
        StubGeocoder::new()
            .with_polygon("Paris, France", degree_square(2.0, 48.0))
            .with_polygon("Iceland", degree_square(-20.0, 64.0))
            .with_candidates("Tiny Village", vec![point_candidate("Tiny Village")])
            .with_failure(
                "Unreachable",
                GeocodeError::Http {
                    url: "https://example.org/search".to_owned(),
                    status: 503,
                    message: "service unavailable".to_owned(),
                },
            )
            .with_delay("Slow Town", Duration::from_secs(5))
    }

    #[rstest]
    fn first_polygonal_candidate_wins() {
        let candidates = vec![
            point_candidate("Centre"),
            GeocodeCandidate {
                display_name: "No outline".to_owned(),
                geojson: None,
            },
            GeocodeCandidate {
                display_name: "First".to_owned(),
                geojson: Some(GeoJsonGeometry::from_region(&degree_square(0.0, 0.0))),
            },
            GeocodeCandidate {
                display_name: "Second".to_owned(),
                geojson: Some(GeoJsonGeometry::from_region(&degree_square(9.0, 9.0))),
            },
        ];
        let region = select_region(&candidates).expect("well-formed outline");
        assert_eq!(region, Some(degree_square(0.0, 0.0)));
    }

    #[rstest]
    fn malformed_outline_is_reported() {
        let candidates = vec![GeocodeCandidate {
            display_name: "Broken".to_owned(),
            geojson: Some(GeoJsonGeometry {
                kind: "Polygon".to_owned(),
                coordinates: json!("oops"),
            }),
        }];
        assert!(select_region(&candidates).is_err());
    }

    #[rstest]
    fn resolves_polygon_for_known_place(stub: StubGeocoder) {
        let region = block_on_for_tests(resolve_place_name(&stub, "Paris, France", TIMEOUT))
            .expect("polygon found");
        assert_eq!(polygon_count(Some(&region)), 1);
    }

    #[rstest]
    #[case("Tiny Village")]
    #[case("Unreachable")]
    #[case("Slow Town")]
    #[case("Nowhere At All")]
    fn soft_fails_to_none(stub: StubGeocoder, #[case] name: &str) {
        assert!(block_on_for_tests(resolve_place_name(&stub, name, TIMEOUT)).is_none());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_skip_the_lookup(stub: StubGeocoder, #[case] name: &str) {
        assert!(block_on_for_tests(resolve_place_name(&stub, name, TIMEOUT)).is_none());
        assert!(stub.calls().is_empty());
    }

    #[rstest]
    fn update_reuses_cache_and_drops_stale_names(stub: StubGeocoder) {
        let mut regions = PlaceRegions::new();
        block_on_for_tests(update_place_regions(
            &mut regions,
            &names(&["Paris, France", "Unreachable"]),
            &stub,
            TIMEOUT,
        ));
        block_on_for_tests(update_place_regions(
            &mut regions,
            &names(&["Iceland", "Paris, France"]),
            &stub,
            TIMEOUT,
        ));

        assert_eq!(
            regions.names().collect::<Vec<_>>(),
            ["Iceland", "Paris, France"]
        );
        assert_eq!(stub.calls(), ["Paris, France", "Unreachable", "Iceland"]);
    }

    #[rstest]
    fn update_isolates_failures(stub: StubGeocoder) {
        let mut regions = PlaceRegions::new();
        block_on_for_tests(update_place_regions(
            &mut regions,
            &names(&["Unreachable", "Slow Town", "Iceland"]),
            &stub,
            TIMEOUT,
        ));
        assert_eq!(regions.len(), 3);
        assert_eq!(regions.regions().flatten().count(), 1);
    }

    #[rstest]
    fn refresh_recomputes_polygon_and_time_limit(stub: StubGeocoder) {
        let mut settings = MapSettings {
            drawn_polygons: vec![degree_square(100.0, 0.0)],
            place_names: names(&["Iceland", "Tiny Village"]),
            time_limit_minutes: 1,
            time_limit_seconds: 5,
            ..MapSettings::default()
        };
        block_on_for_tests(refresh_map_settings(&mut settings, &stub, TIMEOUT));

        assert_eq!(polygon_count(settings.polygon.as_ref()), 2);
        assert!(settings.area > 0.0);
        assert_eq!(settings.time_limit, 65);
    }

    #[rstest]
    fn load_resolves_document_names(stub: StubGeocoder) {
        let document = MapSettingsDocument {
            map_name: "Europe".to_owned(),
            loc_strings: names(&["Paris, France"]),
            ..MapSettingsDocument::default()
        };
        let settings = block_on_for_tests(load_map_settings(document, &stub, TIMEOUT));
        assert_eq!(settings.place_regions.len(), 1);
        assert_eq!(polygon_count(settings.polygon.as_ref()), 1);
    }
}
