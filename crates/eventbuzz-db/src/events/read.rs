//! Read operations for the `events` table.

use sqlx::PgPool;

use super::types::{EventRow, EventStatus};

const EVENT_COLUMNS: &str = "e.event_key, e.title, e.description, \
     c.id AS category_id, c.name AS category_name, c.slug AS category_slug, \
     c.color_hex AS category_color_hex, c.icon AS category_icon, \
     e.latitude, e.longitude, e.address, e.city, \
     e.start_date, e.end_date, e.image_url, e.ticket_url, \
     e.price_min, e.price_max, e.currency, \
     ARRAY(SELECT t.tag FROM event_tags t WHERE t.event_id = e.id ORDER BY t.position) AS tags, \
     ARRAY(SELECT i.url FROM event_images i WHERE i.event_id = e.id ORDER BY i.position) AS images";

/// Every active event with its category, in insertion order.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_active_events(pool: &PgPool) -> Result<Vec<EventRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} \
         FROM events e \
         JOIN categories c ON c.id = e.category_id \
         WHERE e.status = $1 \
         ORDER BY e.id"
    );
    sqlx::query_as::<_, EventRow>(&sql)
        .bind(EventStatus::Active.as_str())
        .fetch_all(pool)
        .await
}

/// One active event by its catalog key, or `None`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_active_event(
    pool: &PgPool,
    event_key: &str,
) -> Result<Option<EventRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {EVENT_COLUMNS} \
         FROM events e \
         JOIN categories c ON c.id = e.category_id \
         WHERE e.status = $1 AND e.event_key = $2"
    );
    sqlx::query_as::<_, EventRow>(&sql)
        .bind(EventStatus::Active.as_str())
        .bind(event_key)
        .fetch_optional(pool)
        .await
}

/// Number of events in the given lifecycle state.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_events_by_status(
    pool: &PgPool,
    status: EventStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE status = $1")
        .bind(status.as_str())
        .fetch_one(pool)
        .await
}
