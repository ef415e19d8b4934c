use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use eventbuzz_core::{CatalogFile, Category, ConfigError, Event};

use crate::catalog::{CatalogError, CatalogSource};

/// An immutable in-memory catalog.
///
/// Reads hand out clones of the shared `Arc`, so every query sees the same
/// snapshot without copying the events.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    categories: Arc<[Category]>,
    events: Arc<[Event]>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(categories: Vec<Category>, events: Vec<Event>) -> Self {
        Self {
            categories: categories.into(),
            events: events.into(),
        }
    }

    /// Build from an already-parsed fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the file fails validation.
    pub fn from_catalog_file(file: CatalogFile) -> Result<Self, ConfigError> {
        let (categories, events) = file.into_catalog()?;
        Ok(Self::new(categories, events))
    }

    /// Load the YAML fixture at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = eventbuzz_core::load_catalog(path)?;
        let catalog = Self::from_catalog_file(file)?;
        tracing::info!(
            path = %path.display(),
            events = catalog.events.len(),
            categories = catalog.categories.len(),
            "loaded fixture catalog"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_all_events(&self) -> Result<Arc<[Event]>, CatalogError> {
        Ok(Arc::clone(&self.events))
    }

    async fn list_all_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.to_vec())
    }

    async fn get_event_by_id(&self, id: &str) -> Result<Option<Event>, CatalogError> {
        Ok(self.events.iter().find(|e| e.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> StaticCatalog {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
        StaticCatalog::from_path(&path).expect("bundled catalog")
    }

    #[tokio::test]
    async fn snapshots_share_the_same_allocation() {
        let catalog = bundled();
        let a = catalog.list_all_events().await.unwrap();
        let b = catalog.list_all_events().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn lookup_finds_known_event() {
        let catalog = bundled();
        let event = catalog.get_event_by_id("51").await.unwrap().expect("event 51");
        assert_eq!(event.title, "Bangalore Jazz Festival");
        assert_eq!(event.category.slug, "music");
    }

    #[tokio::test]
    async fn lookup_unknown_event_is_none() {
        let catalog = bundled();
        assert!(catalog.get_event_by_id("9999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_lists_nothing() {
        let catalog = StaticCatalog::new(vec![], vec![]);
        assert!(catalog.is_empty());
        assert!(catalog.list_all_events().await.unwrap().is_empty());
        assert!(catalog.list_all_categories().await.unwrap().is_empty());
    }
}
