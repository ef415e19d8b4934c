use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Distance,
    Date,
    #[serde(alias = "popular")]
    Popularity,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Distance => write!(f, "distance"),
            SortMode::Date => write!(f, "date"),
            SortMode::Popularity => write!(f, "popularity"),
        }
    }
}

impl FromStr for SortMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortMode::Distance),
            "date" => Ok(SortMode::Date),
            "popularity" | "popular" => Ok(SortMode::Popularity),
            other => Err(CoreError::InvalidFilter(format!(
                "unknown sort mode '{other}'; expected distance, date, or popularity"
            ))),
        }
    }
}

/// Caller-supplied constraints for a single discovery query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub category_slug: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub radius_meters: u32,
    pub query: Option<String>,
    pub sort_by: SortMode,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            category_slug: None,
            date_from: None,
            date_to: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            query: None,
            sort_by: SortMode::Distance,
        }
    }
}

impl EventFilter {
    #[must_use]
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: SortMode) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[must_use]
    pub fn with_date_range(
        mut self,
        date_from: Option<DateTime<Utc>>,
        date_to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = date_from;
        self.date_to = date_to;
        self
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidFilter`] if the radius is zero or the date
    /// bounds are inverted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.radius_meters == 0 {
            return Err(CoreError::InvalidFilter(
                "radius_meters must be greater than zero".to_string(),
            ));
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CoreError::InvalidFilter(format!(
                    "date_from {from} is after date_to {to}"
                )));
            }
        }

        Ok(())
    }
}
