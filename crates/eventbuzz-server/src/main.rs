mod api;
mod middleware;

use std::sync::Arc;

use eventbuzz_core::{AppConfig, CatalogBackend};
use eventbuzz_discovery::{CatalogSource, DiscoveryEngine, SearchDefaults, StaticCatalog};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = eventbuzz_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = open_catalog(&config).await?;
    let engine = DiscoveryEngine::new(catalog).with_search_defaults(SearchDefaults {
        origin: config.default_location,
        radius_floor_meters: config.search_radius_floor_meters,
    });

    let app = build_app(
        AppState {
            engine: Arc::new(engine),
        },
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        backend = %config.catalog_backend,
        "eventbuzz-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn open_catalog(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogSource>> {
    match config.catalog_backend {
        CatalogBackend::Fixture => Ok(Arc::new(StaticCatalog::from_path(&config.catalog_path)?)),
        CatalogBackend::Postgres => {
            let pool = eventbuzz_db::connect_pool_from_config(config).await?;
            let applied = eventbuzz_db::run_migrations(&pool).await?;
            tracing::info!(applied, "database migrations up to date");
            Ok(Arc::new(eventbuzz_db::PgCatalog::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
