use std::sync::Arc;

use async_trait::async_trait;
use eventbuzz_core::{Category, Event};
use eventbuzz_discovery::{CatalogError, CatalogSource};
use sqlx::PgPool;

use crate::{categories, events};

/// A [`CatalogSource`] backed by Postgres.
///
/// Every call materialises a fresh snapshot of the active events, so the
/// engine never sees rows change mid-query.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogSource for PgCatalog {
    async fn list_all_events(&self) -> Result<Arc<[Event]>, CatalogError> {
        let rows = events::list_active_events(&self.pool)
            .await
            .map_err(CatalogError::unavailable)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_all_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let rows = categories::list_categories(&self.pool)
            .await
            .map_err(CatalogError::unavailable)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_event_by_id(&self, id: &str) -> Result<Option<Event>, CatalogError> {
        let row = events::get_active_event(&self.pool, id)
            .await
            .map_err(CatalogError::unavailable)?;
        Ok(row.map(Event::from))
    }
}
