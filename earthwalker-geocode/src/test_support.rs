//! Shared fixtures for geocoding tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use earthwalker_core::{GeoJsonGeometry, Region};

use crate::{GeocodeCandidate, GeocodeError, Geocoder};

/// Stub [`Geocoder`] answering from canned responses.
///
/// Unknown queries succeed with no candidates. Every search is recorded,
/// in call order, before any configured delay elapses.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    responses: HashMap<String, Result<Vec<GeocodeCandidate>, GeocodeError>>,
    delays: HashMap<String, Duration>,
    calls: RefCell<Vec<String>>,
}

impl StubGeocoder {
    /// Construct a stub with no canned responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `candidates`.
    #[must_use]
    pub fn with_candidates(
        mut self,
        query: impl Into<String>,
        candidates: Vec<GeocodeCandidate>,
    ) -> Self {
        self.responses.insert(query.into(), Ok(candidates));
        self
    }

    /// Answer `query` with a single candidate outlined by `region`.
    #[must_use]
    pub fn with_polygon(self, query: impl Into<String>, region: Region) -> Self {
        let name = query.into();
        let candidate = GeocodeCandidate {
            display_name: name.clone(),
            geojson: Some(GeoJsonGeometry::from_region(&region)),
        };
        self.with_candidates(name, vec![candidate])
    }

    /// Fail every search for `query` with `error`.
    #[must_use]
    pub fn with_failure(mut self, query: impl Into<String>, error: GeocodeError) -> Self {
        self.responses.insert(query.into(), Err(error));
        self
    }

    /// Delay the answer for `query` by `delay`.
    #[must_use]
    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    /// Queries searched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Geocoder for StubGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        self.calls.borrow_mut().push(query.to_owned());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// A candidate whose outline is a bare point.
#[must_use]
pub fn point_candidate(name: &str) -> GeocodeCandidate {
    GeocodeCandidate {
        display_name: name.to_owned(),
        geojson: Some(GeoJsonGeometry {
            kind: "Point".to_owned(),
            coordinates: serde_json::json!([0.0, 0.0]),
        }),
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics when the runtime cannot be built.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(future),
        Err(err) => panic!("failed to build test runtime: {err}"),
    }
}
