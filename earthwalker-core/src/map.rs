//! Map settings assembled in the editor and the map definition they produce.
//!
//! [`MapSettings`] is the editing-session view of a map: the raw inputs a
//! user edits (drawn polygons, place names, minutes and seconds) alongside the
//! derived fields the backend stores (the combined polygon, its area, the
//! time limit in seconds). [`MapSettings::to_map`] refreshes the derived
//! fields and emits the backend's [`MapDefinition`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::region::geojson::{option_region, region_list};
use crate::{
    PlayArea, Region, ScoreError, ScoringParams, combine_regions, polygon_count, region_area,
};

const SECONDS_PER_MINUTE: u32 = 60;

/// A place name together with the region it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRegion {
    /// Place name as typed by the user.
    pub name: String,
    /// Resolved region, `None` when the lookup found no polygon.
    pub region: Option<Region>,
}

/// Resolved place regions keyed by name, in place-name order.
///
/// Once rebuilt for a list of names the key set mirrors that list exactly:
/// names that left the list are dropped and every current name has an
/// entry, even when it resolved to nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceRegions(Vec<PlaceRegion>);

impl PlaceRegions {
    /// Create an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Look up the cached entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PlaceRegion> {
        self.0.iter().find(|entry| entry.name == name)
    }

    /// Report whether `name` has been resolved, successfully or not.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Cached names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.name.as_str())
    }

    /// Cached regions in name order, `None` for names without a polygon.
    pub fn regions(&self) -> impl Iterator<Item = Option<&Region>> {
        self.0.iter().map(|entry| entry.region.as_ref())
    }

    /// Number of cached names.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether the cache is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names from `names` that have no cached entry, first occurrence only.
    #[must_use]
    pub fn missing_names(&self, names: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        names
            .iter()
            .filter(|name| !self.contains(name) && seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    /// Rebuild the cache so its keys are exactly `names`.
    ///
    /// Cached entries are reused; the rest are taken from `fresh`. A name
    /// found in neither is recorded as unresolved. Duplicate names keep
    /// their first position.
    #[must_use]
    pub fn rebuild<I>(self, names: &[String], fresh: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<Region>)>,
    {
        let mut cached: HashMap<String, Option<Region>> = self
            .0
            .into_iter()
            .map(|entry| (entry.name, entry.region))
            .collect();
        let mut resolved: HashMap<String, Option<Region>> = fresh.into_iter().collect();
        let mut seen = HashSet::new();
        let entries = names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| PlaceRegion {
                name: name.clone(),
                region: cached
                    .remove(name)
                    .or_else(|| resolved.remove(name))
                    .flatten(),
            })
            .collect();
        Self(entries)
    }
}

impl FromIterator<PlaceRegion> for PlaceRegions {
    fn from_iter<T: IntoIterator<Item = PlaceRegion>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A map being edited.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSettings {
    /// Display name.
    pub name: String,
    /// Combined constraint region, derived by [`Self::update_polygon`].
    pub polygon: Option<Region>,
    /// Area of `polygon` in square metres; zero when unconstrained.
    pub area: f64,
    /// Rounds per challenge.
    pub num_rounds: u32,
    /// Time limit per round in seconds, derived from minutes and seconds.
    pub time_limit: u32,
    /// Editable minutes part of the time limit.
    pub time_limit_minutes: u32,
    /// Editable seconds part of the time limit.
    pub time_limit_seconds: u32,
    /// Full-score radius in metres.
    pub grace_distance: f64,
    /// Minimum panorama density.
    pub min_density: f64,
    /// Maximum panorama density.
    pub max_density: f64,
    /// Required panorama connectedness.
    pub connectedness: i32,
    /// Copyright filter.
    pub copyright: i32,
    /// Panorama source filter.
    pub source: i32,
    /// Whether map labels are shown during play.
    pub show_labels: bool,
    /// Polygons drawn by hand.
    pub drawn_polygons: Vec<Region>,
    /// Place names whose regions constrain the map.
    pub place_names: Vec<String>,
    /// Regions resolved for `place_names`.
    pub place_regions: PlaceRegions,
}

impl MapSettings {
    /// Combine drawn polygons and resolved place regions, then measure them.
    ///
    /// Drawn polygons come first, followed by place regions in name order.
    /// The area is zero when nothing contributes a polygon.
    pub fn update_polygon(&mut self) {
        self.polygon = combine_regions(
            self.drawn_polygons
                .iter()
                .map(Some)
                .chain(self.place_regions.regions()),
        );
        self.area = region_area(self.polygon.as_ref());
        log::debug!(
            "map {:?} constrained by {} polygons over {} m²",
            self.name,
            polygon_count(self.polygon.as_ref()),
            self.area
        );
    }

    /// Derive the time limit in seconds from its editable parts.
    pub const fn update_time_limit(&mut self) {
        self.time_limit = self
            .time_limit_minutes
            .saturating_mul(SECONDS_PER_MINUTE)
            .saturating_add(self.time_limit_seconds);
    }

    /// Split the time limit in seconds into its editable parts.
    pub const fn split_time_limit(&mut self) {
        self.time_limit_minutes = self.time_limit.div_euclid(SECONDS_PER_MINUTE);
        self.time_limit_seconds = self.time_limit.rem_euclid(SECONDS_PER_MINUTE);
    }

    /// Refresh the derived fields from the cached place regions and emit the
    /// map definition the backend stores.
    ///
    /// Place names missing from the cache contribute nothing; resolve them
    /// first to include them.
    pub fn to_map(&mut self) -> MapDefinition {
        self.update_polygon();
        self.update_time_limit();
        MapDefinition {
            name: self.name.clone(),
            polygon: self.polygon.clone(),
            area: self.area,
            num_rounds: self.num_rounds,
            time_limit: self.time_limit,
            grace_distance: self.grace_distance,
            min_density: self.min_density,
            max_density: self.max_density,
            connectedness: self.connectedness,
            copyright: self.copyright,
            source: self.source,
            show_labels: self.show_labels,
        }
    }

    /// Build settings from an editor document.
    ///
    /// Place names are carried over unresolved. The derived polygon covers
    /// only the drawn polygons until the names are resolved.
    #[must_use]
    pub fn from_document(document: MapSettingsDocument) -> Self {
        let mut settings = Self {
            name: document.map_name,
            num_rounds: document.num_rounds,
            time_limit_minutes: document.time_limit_minutes,
            time_limit_seconds: document.time_limit_seconds,
            grace_distance: document.grace_distance,
            min_density: document.min_density,
            max_density: document.max_density,
            connectedness: document.connectedness,
            copyright: document.copyright,
            source: document.source,
            show_labels: document.show_labels,
            drawn_polygons: document.drawn_polygons,
            place_names: document.loc_strings,
            ..Self::default()
        };
        settings.update_time_limit();
        settings.update_polygon();
        settings
    }

    /// Capture the editable fields as an editor document.
    #[must_use]
    pub fn to_document(&self) -> MapSettingsDocument {
        MapSettingsDocument {
            map_name: self.name.clone(),
            num_rounds: self.num_rounds,
            grace_distance: self.grace_distance,
            min_density: self.min_density,
            max_density: self.max_density,
            connectedness: self.connectedness,
            copyright: self.copyright,
            source: self.source,
            show_labels: self.show_labels,
            time_limit_seconds: self.time_limit_seconds,
            time_limit_minutes: self.time_limit_minutes,
            loc_strings: self.place_names.clone(),
            drawn_polygons: self.drawn_polygons.clone(),
        }
    }
}

/// The editor's saved form of a map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapSettingsDocument {
    /// Display name.
    pub map_name: String,
    /// Rounds per challenge.
    pub num_rounds: u32,
    /// Full-score radius in metres.
    pub grace_distance: f64,
    /// Minimum panorama density.
    pub min_density: f64,
    /// Maximum panorama density.
    pub max_density: f64,
    /// Required panorama connectedness.
    pub connectedness: i32,
    /// Copyright filter.
    pub copyright: i32,
    /// Panorama source filter.
    pub source: i32,
    /// Whether map labels are shown during play.
    pub show_labels: bool,
    /// Seconds part of the time limit.
    pub time_limit_seconds: u32,
    /// Minutes part of the time limit.
    pub time_limit_minutes: u32,
    /// Place names constraining the map.
    pub loc_strings: Vec<String>,
    /// Hand-drawn polygons as GeoJSON geometry.
    #[serde(with = "region_list")]
    pub drawn_polygons: Vec<Region>,
}

/// A map as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapDefinition {
    /// Display name.
    pub name: String,
    /// Constraint region, `null` when unconstrained.
    #[serde(with = "option_region")]
    pub polygon: Option<Region>,
    /// Area of `polygon` in square metres; zero when unconstrained.
    pub area: f64,
    /// Rounds per challenge.
    pub num_rounds: u32,
    /// Time limit per round in seconds.
    pub time_limit: u32,
    /// Full-score radius in metres.
    pub grace_distance: f64,
    /// Minimum panorama density.
    pub min_density: f64,
    /// Maximum panorama density.
    pub max_density: f64,
    /// Required panorama connectedness.
    pub connectedness: i32,
    /// Copyright filter.
    pub copyright: i32,
    /// Panorama source filter.
    pub source: i32,
    /// Whether map labels are shown during play.
    pub show_labels: bool,
}

impl MapDefinition {
    /// Area this map is scored against; the whole Earth when unconstrained.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidArea`] when the stored area is negative
    /// or not finite.
    pub fn play_area(&self) -> Result<PlayArea, ScoreError> {
        PlayArea::new(self.area)
    }

    /// Scoring parameters for every round of this map.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidArea`] or
    /// [`ScoreError::InvalidGraceDistance`] for corrupt stored values.
    pub fn scoring_params(&self) -> Result<ScoringParams, ScoreError> {
        ScoringParams::with_area(self.grace_distance, self.play_area()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EARTH_AREA;
    use crate::test_support::degree_square;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[fixture]
    fn settings() -> MapSettings {
        MapSettings {
            name: "Coastlines".to_owned(),
            num_rounds: 5,
            time_limit_minutes: 2,
            time_limit_seconds: 30,
            grace_distance: 50.0,
            show_labels: true,
            drawn_polygons: vec![degree_square(0.0, 0.0)],
            ..MapSettings::default()
        }
    }

    #[rstest]
    fn rebuild_mirrors_current_names() {
        let cache = PlaceRegions::new().rebuild(
            &names(&["Paris", "Atlantis"]),
            [
                ("Paris".to_owned(), Some(degree_square(2.0, 48.0))),
                ("Atlantis".to_owned(), None),
            ],
        );
        let rebuilt = cache.rebuild(&names(&["Atlantis", "Rome"]), [("Rome".to_owned(), None)]);
        assert_eq!(rebuilt.names().collect::<Vec<_>>(), ["Atlantis", "Rome"]);
        assert!(!rebuilt.contains("Paris"));
    }

    #[rstest]
    fn rebuild_prefers_cached_entries() {
        let cache = PlaceRegions::new().rebuild(
            &names(&["Paris"]),
            [("Paris".to_owned(), Some(degree_square(2.0, 48.0)))],
        );
        let rebuilt = cache.rebuild(&names(&["Paris"]), [("Paris".to_owned(), None)]);
        assert!(rebuilt.get("Paris").and_then(|entry| entry.region.as_ref()).is_some());
    }

    #[rstest]
    fn missing_names_skip_cached_and_duplicates() {
        let cache = PlaceRegions::new().rebuild(&names(&["Paris"]), [("Paris".to_owned(), None)]);
        let missing = cache.missing_names(&names(&["Rome", "Paris", "Rome", "Oslo"]));
        assert_eq!(missing, names(&["Rome", "Oslo"]));
    }

    #[rstest]
    fn duplicate_names_keep_first_position() {
        let cache = PlaceRegions::new().rebuild(&names(&["Oslo", "Rome", "Oslo"]), Vec::new());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.names().collect::<Vec<_>>(), ["Oslo", "Rome"]);
    }

    #[rstest]
    fn polygon_combines_drawn_then_place_regions(mut settings: MapSettings) {
        settings.place_names = names(&["Nowhere", "Elsewhere"]);
        settings.place_regions = PlaceRegions::new().rebuild(
            &settings.place_names,
            [
                ("Nowhere".to_owned(), None),
                ("Elsewhere".to_owned(), Some(degree_square(30.0, 30.0))),
            ],
        );
        settings.update_polygon();
        let polygon = settings.polygon.as_ref().expect("combined polygon");
        assert_eq!(polygon.0.len(), 2);
        assert_eq!(polygon.0.first(), degree_square(0.0, 0.0).0.first());
        assert!(settings.area > 0.0);
    }

    #[rstest]
    fn empty_settings_are_unconstrained() {
        let mut settings = MapSettings::default();
        let map = settings.to_map();
        assert!(map.polygon.is_none());
        assert_eq!(map.area, 0.0);
        assert_eq!(map.play_area().expect("valid area").square_metres(), EARTH_AREA);
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(2, 30, 150)]
    #[case(0, 75, 75)]
    fn time_limit_is_minutes_and_seconds(
        #[case] minutes: u32,
        #[case] seconds: u32,
        #[case] expected: u32,
    ) {
        let mut settings = MapSettings {
            time_limit_minutes: minutes,
            time_limit_seconds: seconds,
            ..MapSettings::default()
        };
        settings.update_time_limit();
        assert_eq!(settings.time_limit, expected);
    }

    #[rstest]
    fn split_time_limit_inverts_update() {
        let mut settings = MapSettings {
            time_limit: 150,
            ..MapSettings::default()
        };
        settings.split_time_limit();
        assert_eq!(
            (settings.time_limit_minutes, settings.time_limit_seconds),
            (2, 30)
        );
    }

    #[rstest]
    fn map_definition_uses_backend_field_names(mut settings: MapSettings) {
        let value = serde_json::to_value(settings.to_map()).expect("serialise map");
        assert_eq!(value["Name"], json!("Coastlines"));
        assert_eq!(value["TimeLimit"], json!(150));
        assert_eq!(value["NumRounds"], json!(5));
        assert_eq!(value["Polygon"]["type"], json!("MultiPolygon"));
        assert!(value["Area"].as_f64().is_some_and(|area| area > 0.0));
    }

    #[rstest]
    fn map_definition_reads_null_polygon() {
        let map: MapDefinition = serde_json::from_value(json!({
            "Name": "World", "Polygon": null, "Area": 0.0, "NumRounds": 5,
            "TimeLimit": 0, "GraceDistance": 10.0, "MinDensity": 0.0,
            "MaxDensity": 100.0, "Connectedness": 1, "Copyright": 0,
            "Source": 0, "ShowLabels": true,
        }))
        .expect("map payload");
        assert!(map.polygon.is_none());
        let params = map.scoring_params().expect("valid parameters");
        assert_eq!(params.grace_distance(), 10.0);
        assert_eq!(params.area(), PlayArea::EARTH);
    }

    #[rstest]
    fn corrupt_area_is_rejected() {
        let mut settings = MapSettings::default();
        let mut map = settings.to_map();
        map.area = f64::NAN;
        assert!(matches!(map.play_area(), Err(ScoreError::InvalidArea { .. })));
    }

    #[rstest]
    fn document_uses_editor_field_names(mut settings: MapSettings) {
        settings.place_names = names(&["Iceland"]);
        let value = serde_json::to_value(settings.to_document()).expect("serialise document");
        assert_eq!(value["mapName"], json!("Coastlines"));
        assert_eq!(value["timeLimitMinutes"], json!(2));
        assert_eq!(value["locStrings"], json!(["Iceland"]));
        assert_eq!(value["drawnPolygons"][0]["type"], json!("MultiPolygon"));
    }

    #[rstest]
    fn document_restores_editable_fields(mut settings: MapSettings) {
        settings.place_names = names(&["Iceland"]);
        let restored = MapSettings::from_document(settings.to_document());
        assert_eq!(restored.name, settings.name);
        assert_eq!(restored.time_limit, 150);
        assert_eq!(restored.place_names, settings.place_names);
        assert!(restored.place_regions.is_empty());
        assert_eq!(restored.drawn_polygons, settings.drawn_polygons);
        assert!(restored.area > 0.0);
    }

    #[rstest]
    fn sparse_document_uses_defaults() {
        let document: MapSettingsDocument =
            serde_json::from_value(json!({"mapName": "Bare"})).expect("document");
        let restored = MapSettings::from_document(document);
        assert_eq!(restored.name, "Bare");
        assert!(restored.polygon.is_none());
        assert_eq!(restored.area, 0.0);
    }
}
