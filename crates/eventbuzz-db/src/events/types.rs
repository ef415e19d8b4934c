//! Row types for the `events` table.

use chrono::{DateTime, Utc};
use eventbuzz_core::{Category, Event, GeoPoint};
use rust_decimal::Decimal;

/// Lifecycle state stored in `events.status`. Only `Active` events are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    Active,
    Cancelled,
    Draft,
}

impl EventStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Draft => "draft",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `events` row joined with its category, tags and images.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub event_key: String,
    pub title: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub category_name: String,
    pub category_slug: String,
    pub category_color_hex: String,
    pub category_icon: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub ticket_url: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub currency: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.event_key,
            title: row.title,
            description: row.description,
            category: Category {
                id: row.category_id,
                name: row.category_name,
                slug: row.category_slug,
                color_hex: row.category_color_hex,
                icon: row.category_icon,
            },
            location: GeoPoint::new(row.latitude, row.longitude),
            address: row.address,
            city: row.city,
            start_date: row.start_date,
            end_date: row.end_date,
            image_url: row.image_url,
            ticket_url: row.ticket_url,
            price_min: row.price_min,
            price_max: row.price_max,
            currency: row.currency,
            tags: row.tags,
            images: row.images,
        }
    }
}
