use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use eventbuzz_core::{AnnotatedEvent, Event, EventBubble, EventFilter, GeoPoint, SortMode};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_discovery_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;
const MAX_QUERY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
pub(super) struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub pages: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BubblesQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub(super) fn normalize_page_size(page_size: Option<u32>) -> u32 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

fn paginate<T: Serialize>(
    results: Vec<T>,
    page: Option<u32>,
    page_size: Option<u32>,
    req_id: &str,
) -> Result<Page<T>, ApiError> {
    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::validation(req_id, "page must be at least 1"));
    }
    let page_size = normalize_page_size(page_size);

    let total = results.len();
    let size = page_size as usize;
    let skip = (page as usize - 1).saturating_mul(size);
    let items = results.into_iter().skip(skip).take(size).collect();

    Ok(Page {
        items,
        total,
        page,
        page_size,
        pages: total.div_ceil(size),
    })
}

fn parse_query<T>(query: Result<Query<T>, QueryRejection>, req_id: &str) -> Result<T, ApiError> {
    query
        .map(|Query(q)| q)
        .map_err(|e| ApiError::validation(req_id, e.body_text()))
}

fn required_origin(lat: Option<f64>, lng: Option<f64>, req_id: &str) -> Result<GeoPoint, ApiError> {
    match optional_origin(lat, lng, req_id)? {
        Some(origin) => Ok(origin),
        None => Err(ApiError::validation(req_id, "lat and lng are required")),
    }
}

fn optional_origin(
    lat: Option<f64>,
    lng: Option<f64>,
    req_id: &str,
) -> Result<Option<GeoPoint>, ApiError> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let origin = GeoPoint::new(lat, lng);
            if origin.is_valid() {
                Ok(Some(origin))
            } else {
                Err(ApiError::validation(
                    req_id,
                    "lat must be within [-90, 90] and lng within [-180, 180]",
                ))
            }
        }
        _ => Err(ApiError::validation(
            req_id,
            "lat and lng must be provided together",
        )),
    }
}

fn parse_sort(sort: Option<&str>, req_id: &str) -> Result<SortMode, ApiError> {
    sort.map_or(Ok(SortMode::default()), |s| {
        s.parse::<SortMode>()
            .map_err(|e| ApiError::validation(req_id, e.to_string()))
    })
}

fn base_filter(radius: Option<u32>, category: Option<String>, sort: SortMode) -> EventFilter {
    let mut filter = EventFilter::default().with_sort(sort);
    if let Some(radius) = radius {
        filter = filter.with_radius(radius);
    }
    if let Some(category) = category {
        filter = filter.with_category(category);
    }
    filter
}

pub(super) async fn list_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<AnnotatedEvent>>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let origin = required_origin(query.lat, query.lng, &req_id.0)?;
    let sort = parse_sort(query.sort.as_deref(), &req_id.0)?;

    let mut filter = base_filter(query.radius, query.category, sort)
        .with_date_range(query.date_from, query.date_to);
    if let Some(q) = query.q {
        filter = filter.with_query(q);
    }

    let results = state
        .engine
        .discover(origin, &filter)
        .await
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;
    let data = paginate(results, query.page, query.page_size, &req_id.0)?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn list_bubbles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<BubblesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<EventBubble>>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let origin = required_origin(query.lat, query.lng, &req_id.0)?;
    let filter = base_filter(query.radius, query.category, SortMode::Distance);

    let data = state
        .engine
        .bubbles(origin, &filter)
        .await
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Page<AnnotatedEvent>>>, ApiError> {
    let query = parse_query(query, &req_id.0)?;
    let text = query.q.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() || text.chars().count() > MAX_QUERY_CHARS {
        return Err(ApiError::validation(
            &req_id.0,
            format!("q must be between 1 and {MAX_QUERY_CHARS} characters"),
        ));
    }
    let origin = optional_origin(query.lat, query.lng, &req_id.0)?;
    let sort = parse_sort(query.sort.as_deref(), &req_id.0)?;
    let filter = base_filter(query.radius, query.category.clone(), sort);

    let results = match origin {
        Some(origin) => state.engine.search_from(origin, text, &filter).await,
        None => state.engine.search(text, &filter).await,
    }
    .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;
    let data = paginate(results, query.page, query.page_size, &req_id.0)?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_event(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, ApiError> {
    let data = state
        .engine
        .get_event_by_id(&id)
        .await
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
