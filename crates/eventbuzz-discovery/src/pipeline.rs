//! The filter pipeline.
//!
//! Stages run in a fixed order: annotate, category, date window, text,
//! radius, sort. None of them fail; an empty catalog or an all-excluding
//! filter produces an empty vector.

use eventbuzz_core::{haversine_meters, AnnotatedEvent, Event, EventFilter, GeoPoint};

use crate::ranking::{sort_events, PopularityProxy};

/// Copy every catalog event and attach its distance from `origin`.
#[must_use]
pub fn annotate(events: &[Event], origin: GeoPoint) -> Vec<AnnotatedEvent> {
    events
        .iter()
        .map(|e| AnnotatedEvent::new(e.clone(), haversine_meters(origin, e.location)))
        .collect()
}

/// Exact, case-sensitive slug match.
pub fn retain_category(events: &mut Vec<AnnotatedEvent>, slug: Option<&str>) {
    if let Some(slug) = slug {
        events.retain(|e| e.event.category.slug == slug);
    }
}

/// Keep events whose start falls inside the (inclusive) bounds that are set.
pub fn retain_date_window(events: &mut Vec<AnnotatedEvent>, filter: &EventFilter) {
    if let Some(from) = filter.date_from {
        events.retain(|e| e.event.start_date >= from);
    }
    if let Some(to) = filter.date_to {
        events.retain(|e| e.event.start_date <= to);
    }
}

/// Case-insensitive substring match on title or description. Blank is a no-op.
pub fn retain_text(events: &mut Vec<AnnotatedEvent>, query: Option<&str>) {
    let Some(needle) = query.filter(|q| !q.trim().is_empty()) else {
        return;
    };
    let needle = needle.to_lowercase();
    events.retain(|e| e.event.matches_text(&needle));
}

/// Keep events within `radius_meters`. A missing distance counts as zero.
pub fn retain_within_radius(events: &mut Vec<AnnotatedEvent>, radius_meters: u32) {
    let radius = f64::from(radius_meters);
    events.retain(|e| e.distance_meters.unwrap_or(0.0) <= radius);
}

/// Run every stage over `events` and return the sorted survivors.
#[must_use]
pub fn run(
    events: &[Event],
    origin: GeoPoint,
    filter: &EventFilter,
    popularity: &dyn PopularityProxy,
) -> Vec<AnnotatedEvent> {
    let mut results = annotate(events, origin);
    retain_category(&mut results, filter.category_slug.as_deref());
    retain_date_window(&mut results, filter);
    retain_text(&mut results, filter.query.as_deref());
    retain_within_radius(&mut results, filter.radius_meters);
    sort_events(&mut results, filter.sort_by, popularity);
    results
}
