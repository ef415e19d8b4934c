//! Sort strategies for annotated results.

use std::cmp::{Ordering, Reverse};

use eventbuzz_core::{AnnotatedEvent, Event, SortMode};
use rust_decimal::Decimal;

/// Supplies the ranking score for [`SortMode::Popularity`]. Higher ranks first.
pub trait PopularityProxy: Send + Sync {
    fn score(&self, event: &Event) -> Decimal;
}

/// Ranks by `price_max`, treating a missing price as zero.
///
/// Placeholder until the catalog carries a real engagement signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceMaxProxy;

impl PopularityProxy for PriceMaxProxy {
    fn score(&self, event: &Event) -> Decimal {
        event.price_max.unwrap_or(Decimal::ZERO)
    }
}

/// Stable in-place sort; equal keys keep catalog order.
pub fn sort_events(
    events: &mut [AnnotatedEvent],
    mode: SortMode,
    popularity: &dyn PopularityProxy,
) {
    match mode {
        SortMode::Distance => events.sort_by(compare_distance),
        SortMode::Date => events.sort_by_key(|e| e.event.start_date),
        SortMode::Popularity => {
            events.sort_by_cached_key(|e| Reverse(popularity.score(&e.event)));
        }
    }
}

fn compare_distance(a: &AnnotatedEvent, b: &AnnotatedEvent) -> Ordering {
    let a = a.distance_meters.unwrap_or(0.0);
    let b = b.distance_meters.unwrap_or(0.0);
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use eventbuzz_core::{Category, GeoPoint};

    use super::*;

    fn event(id: &str, day: u32, price_max: Option<i64>) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: None,
            category: Category {
                id: 1,
                name: "Music".to_string(),
                slug: "music".to_string(),
                color_hex: "#E91E63".to_string(),
                icon: "music_note".to_string(),
            },
            location: GeoPoint::new(0.0, 0.0),
            address: None,
            city: None,
            start_date: Utc.with_ymd_and_hms(2026, 11, day, 18, 0, 0).unwrap(),
            end_date: None,
            image_url: None,
            ticket_url: None,
            price_min: None,
            price_max: price_max.map(Decimal::from),
            currency: "USD".to_string(),
            tags: vec![],
            images: vec![],
        }
    }

    fn ids(events: &[AnnotatedEvent]) -> Vec<&str> {
        events.iter().map(|e| e.event.id.as_str()).collect()
    }

    #[test]
    fn distance_sort_is_ascending_and_stable() {
        let mut events = vec![
            AnnotatedEvent::new(event("a", 1, None), 300.0),
            AnnotatedEvent::new(event("b", 1, None), 100.0),
            AnnotatedEvent::new(event("c", 1, None), 300.0),
            AnnotatedEvent::new(event("d", 1, None), 100.0),
        ];
        sort_events(&mut events, SortMode::Distance, &PriceMaxProxy);
        assert_eq!(ids(&events), ["b", "d", "a", "c"]);
    }

    #[test]
    fn date_sort_is_ascending_and_stable() {
        let mut events = vec![
            AnnotatedEvent::new(event("a", 5, None), 1.0),
            AnnotatedEvent::new(event("b", 2, None), 2.0),
            AnnotatedEvent::new(event("c", 5, None), 3.0),
            AnnotatedEvent::new(event("d", 2, None), 4.0),
        ];
        sort_events(&mut events, SortMode::Date, &PriceMaxProxy);
        assert_eq!(ids(&events), ["b", "d", "a", "c"]);
    }

    #[test]
    fn popularity_sort_is_descending_with_missing_price_last() {
        let mut events = vec![
            AnnotatedEvent::new(event("a", 1, None), 1.0),
            AnnotatedEvent::new(event("b", 1, Some(50)), 1.0),
            AnnotatedEvent::new(event("c", 1, Some(200)), 1.0),
            AnnotatedEvent::new(event("d", 1, Some(50)), 1.0),
        ];
        sort_events(&mut events, SortMode::Popularity, &PriceMaxProxy);
        assert_eq!(ids(&events), ["c", "b", "d", "a"]);
    }

    struct TitleLength;

    impl PopularityProxy for TitleLength {
        fn score(&self, event: &Event) -> Decimal {
            Decimal::from(event.title.len())
        }
    }

    #[test]
    fn popularity_proxy_is_pluggable() {
        let mut short = event("a", 1, Some(999));
        short.title = "x".to_string();
        let mut long = event("b", 1, None);
        long.title = "a much longer title".to_string();
        let mut events = vec![
            AnnotatedEvent::new(short, 1.0),
            AnnotatedEvent::new(long, 1.0),
        ];
        sort_events(&mut events, SortMode::Popularity, &TitleLength);
        assert_eq!(ids(&events), ["b", "a"]);
    }

    #[test]
    fn missing_distance_sorts_as_zero() {
        let mut unknown = AnnotatedEvent::new(event("a", 1, None), 0.0);
        unknown.distance_meters = None;
        let mut events = vec![AnnotatedEvent::new(event("b", 1, None), 10.0), unknown];
        sort_events(&mut events, SortMode::Distance, &PriceMaxProxy);
        assert_eq!(ids(&events), ["a", "b"]);
    }
}
