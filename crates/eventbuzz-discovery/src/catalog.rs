use std::sync::Arc;

use async_trait::async_trait;
use eventbuzz_core::{Category, Event};
use thiserror::Error;

/// Failures of the backing store. The engine propagates these unchanged.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CatalogError {
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Box::new(err))
    }
}

/// Read-only access to the full event catalog.
///
/// Each call must return a consistent snapshot; the engine never observes a
/// catalog mutating mid-query. Implementations own any caching, retry and
/// timeout policy.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every candidate event, in catalog iteration order.
    async fn list_all_events(&self) -> Result<Arc<[Event]>, CatalogError>;

    async fn list_all_categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Look up one event. The default scans [`Self::list_all_events`].
    async fn get_event_by_id(&self, id: &str) -> Result<Option<Event>, CatalogError> {
        let events = self.list_all_events().await?;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }
}

#[async_trait]
impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    async fn list_all_events(&self) -> Result<Arc<[Event]>, CatalogError> {
        (**self).list_all_events().await
    }

    async fn list_all_categories(&self) -> Result<Vec<Category>, CatalogError> {
        (**self).list_all_categories().await
    }

    async fn get_event_by_id(&self, id: &str) -> Result<Option<Event>, CatalogError> {
        (**self).get_event_by_id(id).await
    }
}
