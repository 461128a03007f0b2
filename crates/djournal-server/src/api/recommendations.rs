use axum::{
    extract::{Path, State},
    Extension, Json,
};
use djournal_core::Recommendation;

use crate::middleware::RequestId;

use super::{map_sentiment_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// GET /api/v1/recommendations: rank locations from every stored entry.
pub(super) async fn list_recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>, ApiError> {
    let data = state
        .insights
        .recommend()
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/users/{user_id}/recommendations: rank locations from one
/// user's entries.
pub(super) async fn list_user_recommendations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>, ApiError> {
    let data = state
        .insights
        .recommend_for_user(user_id)
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
