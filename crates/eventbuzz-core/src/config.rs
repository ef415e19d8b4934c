use crate::app_config::{AppConfig, CatalogBackend, Environment};
use crate::geo::GeoPoint;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("EVENTBUZZ_ENV", "development"))?;
    let bind_addr = parse_addr("EVENTBUZZ_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("EVENTBUZZ_LOG_LEVEL", "info");

    let catalog_backend =
        parse_catalog_backend(&or_default("EVENTBUZZ_CATALOG_BACKEND", "fixture"))?;
    let catalog_path = PathBuf::from(or_default("EVENTBUZZ_CATALOG_PATH", "./config/catalog.yaml"));

    let database_url = lookup("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    if catalog_backend == CatalogBackend::Postgres && database_url.is_none() {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let db_max_connections = parse_u32("EVENTBUZZ_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("EVENTBUZZ_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("EVENTBUZZ_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let default_location = GeoPoint::new(
        parse_f64("EVENTBUZZ_DEFAULT_LAT", "12.9716")?,
        parse_f64("EVENTBUZZ_DEFAULT_LNG", "77.5946")?,
    );
    if !default_location.is_valid() {
        return Err(invalid(
            "EVENTBUZZ_DEFAULT_LAT",
            format!("default location {default_location} is out of range"),
        ));
    }

    let search_radius_floor_meters = parse_u32("EVENTBUZZ_SEARCH_RADIUS_FLOOR_METERS", "50000")?;
    if search_radius_floor_meters == 0 {
        return Err(invalid(
            "EVENTBUZZ_SEARCH_RADIUS_FLOOR_METERS",
            "must be greater than zero".to_string(),
        ));
    }

    let rate_limit_per_minute = parse_usize("EVENTBUZZ_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_backend,
        catalog_path,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        default_location,
        search_radius_floor_meters,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EVENTBUZZ_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_catalog_backend(s: &str) -> Result<CatalogBackend, ConfigError> {
    match s {
        "fixture" => Ok(CatalogBackend::Fixture),
        "postgres" => Ok(CatalogBackend::Postgres),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EVENTBUZZ_CATALOG_BACKEND".to_string(),
            reason: format!("unknown catalog backend '{other}'; expected fixture or postgres"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
