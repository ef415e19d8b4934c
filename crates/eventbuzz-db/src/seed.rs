use eventbuzz_core::{Category, Event};
use sqlx::PgPool;

use crate::DbError;

/// Row counts written by [`seed_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub events: usize,
}

/// Upsert a validated catalog into the database.
///
/// Categories are keyed by id and events by their catalog key. Each event's
/// tags and images are replaced with the ones given, and a re-seeded event is
/// set back to `active`. All upserts run inside a single transaction; if any
/// operation fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_catalog(
    pool: &PgPool,
    categories: &[Category],
    events: &[Event],
) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for category in categories {
        sqlx::query(
            "INSERT INTO categories (id, name, slug, color_hex, icon) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 slug = EXCLUDED.slug, \
                 color_hex = EXCLUDED.color_hex, \
                 icon = EXCLUDED.icon, \
                 updated_at = NOW()",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.color_hex)
        .bind(&category.icon)
        .execute(&mut *tx)
        .await?;

        summary.categories += 1;
    }

    for event in events {
        let event_id: i64 = sqlx::query_scalar(
            "INSERT INTO events (event_key, title, description, category_id, latitude, longitude, \
                                 address, city, start_date, end_date, image_url, ticket_url, \
                                 price_min, price_max, currency, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, 'active') \
             ON CONFLICT (event_key) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 description = EXCLUDED.description, \
                 category_id = EXCLUDED.category_id, \
                 latitude = EXCLUDED.latitude, \
                 longitude = EXCLUDED.longitude, \
                 address = EXCLUDED.address, \
                 city = EXCLUDED.city, \
                 start_date = EXCLUDED.start_date, \
                 end_date = EXCLUDED.end_date, \
                 image_url = EXCLUDED.image_url, \
                 ticket_url = EXCLUDED.ticket_url, \
                 price_min = EXCLUDED.price_min, \
                 price_max = EXCLUDED.price_max, \
                 currency = EXCLUDED.currency, \
                 status = 'active', \
                 updated_at = NOW() \
             RETURNING id",
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.category.id)
        .bind(event.location.latitude)
        .bind(event.location.longitude)
        .bind(&event.address)
        .bind(&event.city)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.image_url)
        .bind(&event.ticket_url)
        .bind(event.price_min)
        .bind(event.price_max)
        .bind(&event.currency)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM event_tags WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO event_tags (event_id, position, tag) \
             SELECT $1, ord::int, tag FROM UNNEST($2::text[]) WITH ORDINALITY AS t(tag, ord)",
        )
        .bind(event_id)
        .bind(&event.tags)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM event_images WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO event_images (event_id, position, url) \
             SELECT $1, ord::int, url FROM UNNEST($2::text[]) WITH ORDINALITY AS u(url, ord)",
        )
        .bind(event_id)
        .bind(&event.images)
        .execute(&mut *tx)
        .await?;

        summary.events += 1;
    }

    tx.commit().await?;
    tracing::info!(
        categories = summary.categories,
        events = summary.events,
        "seeded catalog"
    );
    Ok(summary)
}
