//! Live integration tests for eventbuzz-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx test
//! harness. The `migrations` path is relative to the crate root
//! (`crates/eventbuzz-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use std::path::Path;

use eventbuzz_core::{Category, Event, EventFilter, GeoPoint};
use eventbuzz_db::{
    count_events_by_status, get_active_event, list_active_events, list_categories, seed_catalog,
    EventStatus, PgCatalog,
};
use eventbuzz_discovery::{CatalogSource, DiscoveryEngine, DiscoveryError};

fn bundled_catalog() -> (Vec<Category>, Vec<Event>) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
    eventbuzz_core::load_catalog(&path)
        .and_then(eventbuzz_core::CatalogFile::into_catalog)
        .expect("bundled catalog")
}

#[sqlx::test(migrations = "../../migrations")]
async fn seed_catalog_is_idempotent(pool: sqlx::PgPool) {
    let (categories, events) = bundled_catalog();

    let first = seed_catalog(&pool, &categories, &events)
        .await
        .expect("first seed");
    let second = seed_catalog(&pool, &categories, &events)
        .await
        .expect("second seed");

    assert_eq!(first, second);
    assert_eq!(first.categories, 7);
    assert_eq!(first.events, 100);
    let active = count_events_by_status(&pool, EventStatus::Active)
        .await
        .expect("count");
    assert_eq!(active, 100);
}

#[sqlx::test(migrations = "../../migrations")]
async fn seeded_rows_round_trip_to_domain_events(pool: sqlx::PgPool) {
    let (categories, events) = bundled_catalog();
    seed_catalog(&pool, &categories, &events)
        .await
        .expect("seed");

    let rows = list_active_events(&pool).await.expect("list");
    let loaded: Vec<Event> = rows.into_iter().map(Event::from).collect();
    assert_eq!(loaded, events);

    let listed = list_categories(&pool).await.expect("categories");
    assert_eq!(listed.len(), 7);
    assert_eq!(listed[0].slug, "music");
}

#[sqlx::test(migrations = "../../migrations")]
async fn tags_keep_catalog_order_and_duplicates(pool: sqlx::PgPool) {
    let (categories, mut events) = bundled_catalog();
    events.truncate(1);
    events[0].tags = vec![
        "zydeco".to_string(),
        "acoustic".to_string(),
        "zydeco".to_string(),
    ];
    seed_catalog(&pool, &categories, &events)
        .await
        .expect("seed");

    let row = get_active_event(&pool, &events[0].id)
        .await
        .expect("get")
        .expect("seeded event");
    assert_eq!(row.tags, ["zydeco", "acoustic", "zydeco"]);

    events[0].tags = vec!["acoustic".to_string()];
    seed_catalog(&pool, &categories, &events)
        .await
        .expect("reseed");
    let row = get_active_event(&pool, &events[0].id)
        .await
        .expect("get")
        .expect("seeded event");
    assert_eq!(row.tags, ["acoustic"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn cancelled_events_are_not_served(pool: sqlx::PgPool) {
    let (categories, events) = bundled_catalog();
    seed_catalog(&pool, &categories, &events)
        .await
        .expect("seed");

    sqlx::query("UPDATE events SET status = 'cancelled' WHERE event_key = '51'")
        .execute(&pool)
        .await
        .expect("cancel");

    assert!(get_active_event(&pool, "51").await.expect("get").is_none());
    assert!(get_active_event(&pool, "52").await.expect("get").is_some());

    let catalog = PgCatalog::new(pool.clone());
    let snapshot = catalog.list_all_events().await.expect("snapshot");
    assert_eq!(snapshot.len(), 99);
    assert!(snapshot.iter().all(|e| e.id != "51"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn engine_over_postgres_matches_fixture_engine(pool: sqlx::PgPool) {
    let (categories, events) = bundled_catalog();
    seed_catalog(&pool, &categories, &events)
        .await
        .expect("seed");

    let pg = DiscoveryEngine::new(PgCatalog::new(pool));
    let fixture = DiscoveryEngine::new(eventbuzz_discovery::StaticCatalog::new(categories, events));
    let origin = GeoPoint::new(12.9716, 77.5946);
    let filter = EventFilter::default().with_radius(25_000);

    let from_pg: Vec<String> = pg
        .discover(origin, &filter)
        .await
        .expect("pg discover")
        .into_iter()
        .map(|e| e.event.id)
        .collect();
    let from_fixture: Vec<String> = fixture
        .discover(origin, &filter)
        .await
        .expect("fixture discover")
        .into_iter()
        .map(|e| e.event.id)
        .collect();
    assert_eq!(from_pg, from_fixture);

    let err = pg.get_event_by_id("missing").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NotFound { .. }));
}
