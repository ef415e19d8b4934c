use eventbuzz_core::AppConfig;

/// Verify the configured database is reachable.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the ping fails.
pub(crate) async fn run_db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = eventbuzz_db::connect_pool_from_config(config).await?;
    eventbuzz_db::health_check(&pool).await?;
    println!("database ok");
    Ok(())
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub(crate) async fn run_db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = eventbuzz_db::connect_pool_from_config(config).await?;
    let applied = eventbuzz_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Load the fixture catalog at `catalog_path` into the database.
///
/// Migrations run first so a fresh database can be seeded in one step.
///
/// # Errors
///
/// Returns an error if the fixture is invalid or any database operation fails.
pub(crate) async fn run_db_seed(config: &AppConfig) -> anyhow::Result<()> {
    let file = eventbuzz_core::load_catalog(&config.catalog_path)?;
    let (categories, events) = file.into_catalog()?;

    let pool = eventbuzz_db::connect_pool_from_config(config).await?;
    eventbuzz_db::run_migrations(&pool).await?;
    let summary = eventbuzz_db::seed_catalog(&pool, &categories, &events).await?;

    tracing::info!(path = %config.catalog_path.display(), "catalog seeded");
    println!(
        "seeded {} categories and {} events",
        summary.categories, summary.events
    );
    Ok(())
}
