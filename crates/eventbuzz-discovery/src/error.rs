use eventbuzz_core::CoreError;
use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No event in the catalog has the requested identifier.
    #[error("event '{id}' not found")]
    NotFound { id: String },
    #[error(transparent)]
    InvalidFilter(#[from] CoreError),
    /// The catalog source failed; passed through unchanged.
    #[error(transparent)]
    Upstream(#[from] CatalogError),
}
