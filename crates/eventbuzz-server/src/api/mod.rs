mod categories;
mod events;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use eventbuzz_discovery::{CatalogSource, DiscoveryEngine, DiscoveryError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// The engine type every handler runs against; the catalog backend is chosen
/// at startup.
pub type Engine = DiscoveryEngine<Arc<dyn CatalogSource>>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn validation(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "validation_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_failure" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_discovery_error(request_id: String, error: &DiscoveryError) -> ApiError {
    match error {
        DiscoveryError::NotFound { id } => {
            ApiError::new(request_id, "not_found", format!("event '{id}' not found"))
        }
        DiscoveryError::InvalidFilter(e) => ApiError::validation(request_id, e.to_string()),
        DiscoveryError::Upstream(e) => {
            tracing::error!(error = %e, "catalog source failed");
            ApiError::new(request_id, "upstream_failure", "event catalog unavailable")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/categories", get(categories::list_categories))
        .route("/api/v1/events/nearby", get(events::list_nearby))
        .route("/api/v1/events/bubbles", get(events::list_bubbles))
        .route("/api/v1/events/search", get(events::search))
        .route("/api/v1/events/{id}", get(events::get_event))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.engine.catalog().list_all_events().await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    catalog: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: catalog unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        catalog: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use eventbuzz_core::{Category, Event};
    use eventbuzz_discovery::{CatalogError, StaticCatalog};
    use tower::ServiceExt;

    fn fixture_state() -> AppState {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
        let catalog: Arc<dyn CatalogSource> =
            Arc::new(StaticCatalog::from_path(&path).expect("bundled catalog"));
        AppState {
            engine: Arc::new(DiscoveryEngine::new(catalog)),
        }
    }

    struct DownCatalog;

    fn connection_reset() -> CatalogError {
        CatalogError::unavailable(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    }

    #[async_trait]
    impl CatalogSource for DownCatalog {
        async fn list_all_events(&self) -> Result<Arc<[Event]>, CatalogError> {
            Err(connection_reset())
        }

        async fn list_all_categories(&self) -> Result<Vec<Category>, CatalogError> {
            Err(connection_reset())
        }
    }

    fn down_state() -> AppState {
        let catalog: Arc<dyn CatalogSource> = Arc::new(DownCatalog);
        AppState {
            engine: Arc::new(DiscoveryEngine::new(catalog)),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    fn app(state: AppState) -> Router {
        build_app(state, RateLimitState::per_minute(1_000))
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let cases = [
            ("validation_error", StatusCode::BAD_REQUEST),
            ("not_found", StatusCode::NOT_FOUND),
            ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
            ("upstream_failure", StatusCode::BAD_GATEWAY),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "message").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[tokio::test]
    async fn health_reports_ok_for_fixture_catalog() {
        let (status, json) = get_json(app(fixture_state()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["catalog"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn health_reports_degraded_when_catalog_fails() {
        let (status, json) = get_json(app(down_state()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["data"]["status"], "degraded");
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let response = app(fixture_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().unwrap()),
            Some("abc-123")
        );
    }

    #[tokio::test]
    async fn categories_are_listed_by_name() {
        let (status, json) = get_json(app(fixture_state()), "/api/v1/categories").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 7);
        assert_eq!(data[0]["name"], "Arts");
        assert_eq!(data[0]["slug"], "arts");
    }

    #[tokio::test]
    async fn nearby_returns_paginated_distance_sorted_events() {
        let (status, json) = get_json(
            app(fixture_state()),
            "/api/v1/events/nearby?lat=12.9716&lng=77.5946&radius=30000&page_size=5",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let page = &json["data"];
        assert_eq!(page["page"], 1);
        assert_eq!(page["page_size"], 5);
        let items = page["items"].as_array().expect("items");
        assert!(!items.is_empty() && items.len() <= 5);
        assert!(page["total"].as_u64().unwrap() >= items.len() as u64);
        let distances: Vec<f64> = items
            .iter()
            .map(|i| i["distance_meters"].as_f64().expect("distance"))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert!(distances.iter().all(|d| *d <= 30_000.0));
    }

    #[tokio::test]
    async fn nearby_second_page_continues_the_first() {
        let base = "/api/v1/events/nearby?lat=12.9716&lng=77.5946&radius=50000&page_size=2";
        let (_, all) = get_json(
            app(fixture_state()),
            "/api/v1/events/nearby?lat=12.9716&lng=77.5946&radius=50000&page_size=100",
        )
        .await;
        let (_, second) = get_json(app(fixture_state()), &format!("{base}&page=2")).await;

        let all_ids: Vec<&str> = all["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        let second_ids: Vec<&str> = second["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(second_ids, all_ids[2..4]);
        assert_eq!(second["data"]["total"], all["data"]["total"]);
    }

    #[tokio::test]
    async fn nearby_clamps_page_size() {
        let (status, json) = get_json(
            app(fixture_state()),
            "/api/v1/events/nearby?lat=0&lng=0&page_size=1000",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["page_size"], 100);
        assert_eq!(json["data"]["total"], 0);
        assert_eq!(json["data"]["pages"], 0);
    }

    #[tokio::test]
    async fn nearby_filters_by_category_and_text() {
        let (status, json) = get_json(
            app(fixture_state()),
            "/api/v1/events/nearby?lat=12.9716&lng=77.5946&radius=50000&category=music&q=JAZZ",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = json["data"]["items"].as_array().expect("items");
        assert!(items.iter().any(|i| i["id"] == "51"));
        assert!(items.iter().all(|i| i["category"]["slug"] == "music"));
    }

    #[tokio::test]
    async fn nearby_rejects_bad_input() {
        for uri in [
            "/api/v1/events/nearby?lng=77.5",
            "/api/v1/events/nearby?lat=91&lng=0",
            "/api/v1/events/nearby?lat=0&lng=-181",
            "/api/v1/events/nearby?lat=0&lng=0&radius=0",
            "/api/v1/events/nearby?lat=0&lng=0&radius=-5",
            "/api/v1/events/nearby?lat=abc&lng=0",
            "/api/v1/events/nearby?lat=0&lng=0&sort=rating",
            "/api/v1/events/nearby?lat=0&lng=0&page=0",
            "/api/v1/events/nearby?lat=0&lng=0&date_from=2026-12-01T00:00:00Z&date_to=2026-11-01T00:00:00Z",
        ] {
            let (status, json) = get_json(app(fixture_state()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert_eq!(json["error"]["code"], "validation_error", "uri {uri}");
        }
    }

    #[tokio::test]
    async fn nearby_maps_catalog_failure_to_bad_gateway() {
        let (status, json) =
            get_json(app(down_state()), "/api/v1/events/nearby?lat=0&lng=0").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_failure");
    }

    #[tokio::test]
    async fn bubbles_carry_category_colour() {
        let (status, json) = get_json(
            app(fixture_state()),
            "/api/v1/events/bubbles?lat=12.9716&lng=77.5946&radius=50000&category=music",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let bubbles = json["data"].as_array().expect("bubbles");
        assert!(!bubbles.is_empty());
        assert!(bubbles.iter().all(|b| b["color_hex"] == "#E91E63"));
    }

    #[tokio::test]
    async fn search_uses_default_origin() {
        let (status, json) = get_json(app(fixture_state()), "/api/v1/events/search?q=jazz").await;
        assert_eq!(status, StatusCode::OK);
        let items = json["data"]["items"].as_array().expect("items");
        assert!(items.iter().any(|i| i["id"] == "51"));
        assert!(items.iter().all(|i| i["id"] != "1"));
    }

    #[tokio::test]
    async fn search_from_caller_location() {
        let (status, json) = get_json(
            app(fixture_state()),
            "/api/v1/events/search?q=jazz&lat=40.7128&lng=-74.0060",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = json["data"]["items"].as_array().expect("items");
        assert_eq!(items[0]["id"], "1");
    }

    #[tokio::test]
    async fn search_rejects_bad_input() {
        let long = "x".repeat(201);
        for uri in [
            "/api/v1/events/search".to_string(),
            "/api/v1/events/search?q=%20%20".to_string(),
            format!("/api/v1/events/search?q={long}"),
            "/api/v1/events/search?q=jazz&lat=12.9".to_string(),
        ] {
            let (status, json) = get_json(app(fixture_state()), &uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
            assert_eq!(json["error"]["code"], "validation_error");
        }
    }

    #[tokio::test]
    async fn event_detail_and_not_found() {
        let (status, json) = get_json(app(fixture_state()), "/api/v1/events/51").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Bangalore Jazz Festival");

        let (status, json) = get_json(app(fixture_state()), "/api/v1/events/9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn rate_limit_rejects_after_budget() {
        let app = build_app(fixture_state(), RateLimitState::per_minute(1));

        let (first, _) = get_json(app.clone(), "/api/v1/categories").await;
        let (second, json) = get_json(app.clone(), "/api/v1/categories").await;
        let (health, _) = get_json(app, "/api/v1/health").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
        assert_eq!(health, StatusCode::OK);
    }
}
