use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::CoreError;

/// An entry in the fixed category taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    /// URL-safe key, unique across the registry and stored lowercase.
    pub slug: String,
    pub color_hex: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub location: GeoPoint,
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

impl Event {
    /// Check the price-range and date-range invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidEvent`] when `price_min > price_max` or
    /// `end_date < start_date`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.price_min, self.price_max) {
            if min > max {
                return Err(CoreError::InvalidEvent {
                    id: self.id.clone(),
                    reason: format!("price_min {min} exceeds price_max {max}"),
                });
            }
        }

        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(CoreError::InvalidEvent {
                    id: self.id.clone(),
                    reason: format!("end_date {end} precedes start_date {}", self.start_date),
                });
            }
        }

        Ok(())
    }

    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// An event copied out of the catalog for one query, with its distance from
/// the query origin attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub distance_meters: Option<f64>,
}

impl AnnotatedEvent {
    #[must_use]
    pub fn new(event: Event, distance_meters: f64) -> Self {
        Self {
            event,
            distance_meters: Some(distance_meters),
        }
    }
}

/// Minimal marker data for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBubble {
    pub id: String,
    pub title: String,
    pub location: GeoPoint,
    pub category_id: i32,
    pub color_hex: String,
    pub start_date: DateTime<Utc>,
}

impl From<&AnnotatedEvent> for EventBubble {
    fn from(annotated: &AnnotatedEvent) -> Self {
        let event = &annotated.event;
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            location: event.location,
            category_id: event.category.id,
            color_hex: event.category.color_hex.clone(),
            start_date: event.start_date,
        }
    }
}
