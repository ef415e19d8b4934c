use std::sync::Arc;

use chrono::{DateTime, Utc};
use eventbuzz_core::{
    format_distance, AnnotatedEvent, AppConfig, CatalogBackend, Event, EventFilter, GeoPoint,
    SortMode,
};
use eventbuzz_discovery::{CatalogSource, DiscoveryEngine, SearchDefaults, StaticCatalog};

const TITLE_WIDTH: usize = 40;

#[derive(Debug)]
pub(crate) struct DiscoverArgs {
    pub lat: f64,
    pub lng: f64,
    pub radius: u32,
    pub category: Option<String>,
    pub query: Option<String>,
    pub sort: SortMode,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: usize,
}

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub query: String,
    pub origin: Option<(f64, f64)>,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub sort: SortMode,
    pub limit: usize,
}

/// Build an engine over the configured catalog backend.
async fn open_engine(
    config: &AppConfig,
) -> anyhow::Result<DiscoveryEngine<Arc<dyn CatalogSource>>> {
    let catalog: Arc<dyn CatalogSource> = match config.catalog_backend {
        CatalogBackend::Fixture => Arc::new(StaticCatalog::from_path(&config.catalog_path)?),
        CatalogBackend::Postgres => {
            let pool = eventbuzz_db::connect_pool_from_config(config).await?;
            Arc::new(eventbuzz_db::PgCatalog::new(pool))
        }
    };
    Ok(DiscoveryEngine::new(catalog).with_search_defaults(SearchDefaults {
        origin: config.default_location,
        radius_floor_meters: config.search_radius_floor_meters,
    }))
}

fn checked_origin(lat: f64, lng: f64) -> anyhow::Result<GeoPoint> {
    let origin = GeoPoint::new(lat, lng);
    anyhow::ensure!(
        origin.is_valid(),
        "invalid location {origin}; lat must be within [-90, 90] and lng within [-180, 180]"
    );
    Ok(origin)
}

/// List events around a location as a table.
///
/// # Errors
///
/// Returns an error if the location or filter is invalid, or the catalog
/// cannot be read.
pub(crate) async fn run_discover(config: &AppConfig, args: DiscoverArgs) -> anyhow::Result<()> {
    let origin = checked_origin(args.lat, args.lng)?;
    let mut filter = EventFilter::default()
        .with_radius(args.radius)
        .with_sort(args.sort)
        .with_date_range(args.from, args.to);
    if let Some(category) = args.category {
        filter = filter.with_category(category);
    }
    if let Some(query) = args.query {
        filter = filter.with_query(query);
    }

    let engine = open_engine(config).await?;
    let results = engine.discover(origin, &filter).await?;
    print_results(&results, args.limit);
    Ok(())
}

/// Free-text search, printed as a table.
///
/// # Errors
///
/// Returns an error if the location is invalid or the catalog cannot be read.
pub(crate) async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    anyhow::ensure!(!args.query.trim().is_empty(), "search query must not be blank");

    let mut filter = EventFilter::default().with_sort(args.sort);
    if let Some(radius) = args.radius {
        filter = filter.with_radius(radius);
    }
    if let Some(category) = args.category {
        filter = filter.with_category(category);
    }

    let engine = open_engine(config).await?;
    let results = match args.origin {
        Some((lat, lng)) => {
            let origin = checked_origin(lat, lng)?;
            engine.search_from(origin, &args.query, &filter).await?
        }
        None => engine.search(&args.query, &filter).await?,
    };
    print_results(&results, args.limit);
    Ok(())
}

/// Print one event in full.
///
/// # Errors
///
/// Returns an error if the event does not exist or the catalog cannot be read.
pub(crate) async fn run_show(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let engine = open_engine(config).await?;
    let event = engine.get_event_by_id(id).await?;
    for line in describe_event(&event) {
        println!("{line}");
    }
    Ok(())
}

/// List categories sorted by name.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let engine = open_engine(config).await?;
    let categories = engine.list_categories().await?;

    println!("{:<6}{:<16}{:<16}{:<10}ICON", "ID", "NAME", "SLUG", "COLOR");
    for category in &categories {
        println!(
            "{:<6}{:<16}{:<16}{:<10}{}",
            category.id, category.name, category.slug, category.color_hex, category.icon
        );
    }
    Ok(())
}

fn print_results(results: &[AnnotatedEvent], limit: usize) {
    if results.is_empty() {
        println!("no events found");
        return;
    }

    println!(
        "{:<6}{:<42}{:<14}{:<10}START",
        "ID", "TITLE", "CATEGORY", "DISTANCE"
    );
    for result in results.iter().take(limit) {
        println!("{}", result_row(result));
    }
    if results.len() > limit {
        println!("... {} more (raise --limit to see them)", results.len() - limit);
    }
}

fn result_row(result: &AnnotatedEvent) -> String {
    let event = &result.event;
    let distance = result
        .distance_meters
        .map_or_else(|| "-".to_string(), format_distance);
    format!(
        "{:<6}{:<42}{:<14}{:<10}{}",
        event.id,
        truncate(&event.title, TITLE_WIDTH),
        event.category.slug,
        distance,
        event.start_date.format("%Y-%m-%d %H:%M")
    )
}

fn describe_event(event: &Event) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({})", event.title, event.id),
        format!("Category: {}", event.category.name),
        format!("When:     {}", event.start_date.format("%Y-%m-%d %H:%M UTC")),
        format!("Where:    {}", event.location),
    ];
    if let Some(address) = &event.address {
        let city = event.city.as_deref().unwrap_or_default();
        lines.push(format!("Address:  {address} {city}").trim_end().to_string());
    }
    match (event.price_min, event.price_max) {
        (Some(min), Some(max)) => lines.push(format!("Price:    {min}-{max} {}", event.currency)),
        (Some(price), None) | (None, Some(price)) => {
            lines.push(format!("Price:    {price} {}", event.currency));
        }
        (None, None) => lines.push("Price:    free".to_string()),
    }
    if !event.tags.is_empty() {
        lines.push(format!("Tags:     {}", event.tags.join(", ")));
    }
    if let Some(description) = &event.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width - 3).collect::<String>())
    } else {
        text.to_string()
    }
}
