//! Location-aware event discovery.
//!
//! [`DiscoveryEngine`] reads a consistent snapshot from a [`CatalogSource`],
//! annotates every event with its distance from the query origin, applies the
//! category, date, text and radius filters, and sorts the survivors.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod ranking;
pub mod static_catalog;

pub use catalog::{CatalogError, CatalogSource};
pub use engine::{DiscoveryEngine, SearchDefaults, SEARCH_RADIUS_FLOOR_METERS};
pub use error::DiscoveryError;
pub use ranking::{PopularityProxy, PriceMaxProxy};
pub use static_catalog::StaticCatalog;
