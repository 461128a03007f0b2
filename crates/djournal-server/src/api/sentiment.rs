use axum::{extract::State, Extension, Json};
use djournal_core::{LocationSentimentRollup, RecomputeSummary, SentimentResult};
use djournal_sentiment::{extract_keywords, score_text, score_text_detailed, SentimentBreakdown};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_sentiment_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ScoreRequest {
    pub text: String,
    #[serde(default)]
    pub detailed: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum ScoreData {
    Summary(SentimentResult),
    Detailed(SentimentBreakdown),
}

#[derive(Debug, Deserialize)]
pub(super) struct KeywordsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(super) struct KeywordsData {
    pub keywords: Vec<String>,
}

/// POST /api/v1/sentiment/score: score arbitrary text without storing it.
pub(super) async fn score(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<ScoreData>>, ApiError> {
    let data = if body.detailed {
        score_text_detailed(&body.text).map(ScoreData::Detailed)
    } else {
        score_text(&body.text).map(ScoreData::Summary)
    }
    .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// POST /api/v1/keywords: the keyword set used for recommendation matching.
pub(super) async fn keywords(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<KeywordsRequest>,
) -> Json<ApiResponse<KeywordsData>> {
    let keywords = extract_keywords(&body.text).into_iter().collect();
    Json(ApiResponse::new(KeywordsData { keywords }, req_id.0))
}

/// GET /api/v1/locations/sentiment: rollups computed from current entries.
pub(super) async fn list_location_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<LocationSentimentRollup>>>, ApiError> {
    let data = state
        .insights
        .aggregate_sentiments()
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/locations/sentiment/recompute: rebuild and persist every
/// location rollup.
pub(super) async fn recompute_location_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RecomputeSummary>>, ApiError> {
    let data = state
        .insights
        .recompute_and_persist()
        .await
        .map_err(|e| map_sentiment_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
