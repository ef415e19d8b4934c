pub mod app_config;
pub mod catalog_file;
pub mod config;
pub mod events;
pub mod filter;
pub mod geo;

pub use app_config::{AppConfig, CatalogBackend, Environment};
pub use catalog_file::{load_catalog, slugify, CatalogFile, CategoryConfig, EventConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use events::{AnnotatedEvent, Category, Event, EventBubble};
pub use filter::{EventFilter, SortMode, DEFAULT_RADIUS_METERS};
pub use geo::{format_distance, haversine_meters, GeoPoint, EARTH_RADIUS_METERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("invalid event '{id}': {reason}")]
    InvalidEvent { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[source] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}
