use std::sync::Arc;

use eventbuzz_core::{AnnotatedEvent, Category, Event, EventBubble, EventFilter, GeoPoint};

use crate::catalog::{CatalogError, CatalogSource};
use crate::error::DiscoveryError;
use crate::pipeline;
use crate::ranking::{PopularityProxy, PriceMaxProxy};

/// Minimum radius applied by [`DiscoveryEngine::search`].
pub const SEARCH_RADIUS_FLOOR_METERS: u32 = 50_000;

/// Origin and radius floor used when a search has no user location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub origin: GeoPoint,
    pub radius_floor_meters: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            origin: GeoPoint::new(12.9716, 77.5946),
            radius_floor_meters: SEARCH_RADIUS_FLOOR_METERS,
        }
    }
}

/// Filters, ranks and looks up events from a [`CatalogSource`].
///
/// The engine holds no mutable state. Every call reads a fresh snapshot from
/// the catalog and returns a freshly built result, so concurrent queries do
/// not interfere.
pub struct DiscoveryEngine<C> {
    catalog: C,
    popularity: Arc<dyn PopularityProxy>,
    search: SearchDefaults,
}

impl<C: CatalogSource> DiscoveryEngine<C> {
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            popularity: Arc::new(PriceMaxProxy),
            search: SearchDefaults::default(),
        }
    }

    #[must_use]
    pub fn with_popularity(mut self, popularity: Arc<dyn PopularityProxy>) -> Self {
        self.popularity = popularity;
        self
    }

    #[must_use]
    pub fn with_search_defaults(mut self, search: SearchDefaults) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub fn search_defaults(&self) -> SearchDefaults {
        self.search
    }

    /// Events around `origin` that satisfy `filter`, sorted by `filter.sort_by`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::InvalidFilter`] for a malformed filter and
    /// [`DiscoveryError::Upstream`] if the catalog cannot be read.
    pub async fn discover(
        &self,
        origin: GeoPoint,
        filter: &EventFilter,
    ) -> Result<Vec<AnnotatedEvent>, DiscoveryError> {
        filter.validate()?;
        let events = self.snapshot().await?;
        let results = pipeline::run(&events, origin, filter, self.popularity.as_ref());

        tracing::debug!(
            %origin,
            radius_meters = filter.radius_meters,
            category = filter.category_slug.as_deref().unwrap_or("-"),
            sort = %filter.sort_by,
            catalog_size = events.len(),
            matched = results.len(),
            "discover"
        );
        Ok(results)
    }

    /// Free-text search from the configured fallback origin.
    ///
    /// The radius is widened to at least the configured floor; a larger
    /// caller radius is kept.
    ///
    /// # Errors
    ///
    /// Same as [`Self::discover`].
    pub async fn search(
        &self,
        query: &str,
        filter: &EventFilter,
    ) -> Result<Vec<AnnotatedEvent>, DiscoveryError> {
        self.search_from(self.search.origin, query, filter).await
    }

    /// Free-text search from a known location, with the same radius floor.
    ///
    /// # Errors
    ///
    /// Same as [`Self::discover`].
    pub async fn search_from(
        &self,
        origin: GeoPoint,
        query: &str,
        filter: &EventFilter,
    ) -> Result<Vec<AnnotatedEvent>, DiscoveryError> {
        let radius = filter.radius_meters.max(self.search.radius_floor_meters);
        let filter = filter.clone().with_query(query).with_radius(radius);
        self.discover(origin, &filter).await
    }

    /// # Errors
    ///
    /// Returns [`DiscoveryError::NotFound`] when no event has `id`, or
    /// [`DiscoveryError::Upstream`] if the catalog fails.
    pub async fn get_event_by_id(&self, id: &str) -> Result<Event, DiscoveryError> {
        let found = self
            .catalog
            .get_event_by_id(id)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, id, "event lookup failed"))?;
        found.ok_or_else(|| DiscoveryError::NotFound { id: id.to_string() })
    }

    /// All categories, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Upstream`] if the catalog fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DiscoveryError> {
        let mut categories = self
            .catalog
            .list_all_categories()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "category listing failed"))?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    /// Map markers for the same result set [`Self::discover`] would return.
    ///
    /// # Errors
    ///
    /// Same as [`Self::discover`].
    pub async fn bubbles(
        &self,
        origin: GeoPoint,
        filter: &EventFilter,
    ) -> Result<Vec<EventBubble>, DiscoveryError> {
        let results = self.discover(origin, filter).await?;
        Ok(results.iter().map(EventBubble::from).collect())
    }

    async fn snapshot(&self) -> Result<Arc<[Event]>, CatalogError> {
        self.catalog
            .list_all_events()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "catalog read failed"))
    }
}
