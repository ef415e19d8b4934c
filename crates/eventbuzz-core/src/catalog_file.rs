//! The YAML fixture catalog: categories plus the events that reference them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::events::{Category, Event};
use crate::geo::GeoPoint;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub id: i32,
    pub name: String,
    /// Derived from `name` when omitted.
    pub slug: Option<String>,
    pub color_hex: String,
    pub icon: String,
}

impl CategoryConfig {
    /// The canonical (lowercase) slug for this category.
    #[must_use]
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) => slugify(slug),
            None => slugify(&self.name),
        }
    }

    fn to_category(&self) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug(),
            color_hex: self.color_hex.clone(),
            icon: self.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Slug of the owning category.
    pub category: String,
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
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

impl CatalogFile {
    /// Resolve category references and build the domain catalog.
    ///
    /// Events keep file order, which becomes the catalog iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the file fails validation.
    pub fn into_catalog(self) -> Result<(Vec<Category>, Vec<Event>), ConfigError> {
        validate_catalog(&self)?;

        let categories: Vec<Category> = self
            .categories
            .iter()
            .map(CategoryConfig::to_category)
            .collect();
        let by_slug: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.slug.as_str(), c)).collect();

        let mut events = Vec::with_capacity(self.events.len());
        for cfg in self.events {
            let category = by_slug
                .get(slugify(&cfg.category).as_str())
                .map(|c| (*c).clone())
                .ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "event '{}' references unknown category '{}'",
                        cfg.id, cfg.category
                    ))
                })?;

            events.push(Event {
                id: cfg.id,
                title: cfg.title,
                description: cfg.description,
                category,
                location: GeoPoint::new(cfg.latitude, cfg.longitude),
                address: cfg.address,
                city: cfg.city,
                start_date: cfg.start_date,
                end_date: cfg.end_date,
                image_url: cfg.image_url,
                ticket_url: cfg.ticket_url,
                price_min: cfg.price_min,
                price_max: cfg.price_max,
                currency: cfg.currency,
                tags: cfg.tags,
                images: cfg.images,
            });
        }

        Ok((categories, events))
    }
}

/// Generate a URL-safe, lowercase slug.
#[must_use]
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' || c == '&' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate the fixture catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for category in &catalog.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(category.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate category id: {}",
                category.id
            )));
        }

        let slug = category.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty slug",
                category.name
            )));
        }
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category slug: '{}' (from category '{}')",
                slug, category.name
            )));
        }
    }

    let mut seen_events = HashSet::new();
    for event in &catalog.events {
        if event.id.trim().is_empty() || event.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "event id and title must be non-empty".to_string(),
            ));
        }

        if !seen_events.insert(event.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate event id: '{}'",
                event.id
            )));
        }

        if !seen_slugs.contains(&slugify(&event.category)) {
            return Err(ConfigError::Validation(format!(
                "event '{}' references unknown category '{}'",
                event.id, event.category
            )));
        }

        let location = GeoPoint::new(event.latitude, event.longitude);
        if !location.is_valid() {
            return Err(ConfigError::Validation(format!(
                "event '{}' has out-of-range coordinates {location}",
                event.id
            )));
        }

        if let (Some(min), Some(max)) = (event.price_min, event.price_max) {
            if min > max {
                return Err(ConfigError::Validation(format!(
                    "event '{}' has price_min {min} greater than price_max {max}",
                    event.id
                )));
            }
        }

        if event.end_date.is_some_and(|end| end < event.start_date) {
            return Err(ConfigError::Validation(format!(
                "event '{}' ends before it starts",
                event.id
            )));
        }
    }

    Ok(())
}
