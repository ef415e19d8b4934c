use axum::{extract::State, Extension, Json};
use eventbuzz_core::Category;

use crate::middleware::RequestId;

use super::{map_discovery_error, ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let data = state
        .engine
        .list_categories()
        .await
        .map_err(|e| map_discovery_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
