use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the event catalog is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    /// The YAML fixture at `catalog_path`, held in memory.
    Fixture,
    /// The Postgres database at `database_url`.
    Postgres,
}

impl std::fmt::Display for CatalogBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogBackend::Fixture => write!(f, "fixture"),
            CatalogBackend::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_backend: CatalogBackend,
    pub catalog_path: PathBuf,
    /// Required when `catalog_backend` is [`CatalogBackend::Postgres`].
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Search origin used when no user location is known.
    pub default_location: GeoPoint,
    pub search_radius_floor_meters: u32,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_backend", &self.catalog_backend)
            .field("catalog_path", &self.catalog_path)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("default_location", &self.default_location)
            .field(
                "search_radius_floor_meters",
                &self.search_radius_floor_meters,
            )
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
