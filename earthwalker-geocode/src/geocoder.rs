//! The geocoder seam and a response-caching decorator.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use earthwalker_core::GeoJsonGeometry;
use serde::{Deserialize, Serialize};

use crate::GeocodeError;

/// One search result returned by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Human-readable name of the match.
    #[serde(default)]
    pub display_name: String,
    /// Outline of the match, absent when the service returned none.
    #[serde(default)]
    pub geojson: Option<GeoJsonGeometry>,
}

/// A free-text place search service.
///
/// Implementations return candidates in the service's ranking order.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Search for places matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError>;
}

/// Memoises successful searches of an inner [`Geocoder`].
///
/// Place outlines are effectively static, so successful responses are kept
/// for the lifetime of the decorator. Failures are not cached and the next
/// search for the same query goes to the inner geocoder again.
///
/// # Examples
///
/// ```
/// use earthwalker_geocode::{CachedGeocoder, Geocoder, test_support::StubGeocoder};
///
/// let cached = CachedGeocoder::new(StubGeocoder::new());
/// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
/// runtime.block_on(async {
///     cached.search("Lisbon").await?;
///     cached.search("Lisbon").await
/// })?;
/// assert_eq!(cached.inner().calls(), ["Lisbon"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    responses: RefCell<HashMap<String, Vec<GeocodeCandidate>>>,
}

impl<G> CachedGeocoder<G> {
    /// Wrap `inner` with an empty cache.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            responses: RefCell::new(HashMap::new()),
        }
    }

    /// Borrow the wrapped geocoder.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Number of queries with a cached response.
    #[must_use]
    pub fn cached_queries(&self) -> usize {
        self.responses.borrow().len()
    }

    /// Discard the cache and return the wrapped geocoder.
    #[must_use]
    pub fn into_inner(self) -> G {
        self.inner
    }
}

#[async_trait(?Send)]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let hit = self.responses.borrow().get(query).cloned();
        if let Some(candidates) = hit {
            log::debug!("geocoder cache hit for {query:?}");
            return Ok(candidates);
        }
        let candidates = self.inner.search(query).await?;
        self.responses
            .borrow_mut()
            .insert(query.to_owned(), candidates.clone());
        Ok(candidates)
    }
}
