use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use djournal_db::LocationRow;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct LocationItem {
    pub location_id: i64,
    pub name: String,
    pub place: String,
    pub description: String,
    pub entries_count: i32,
    pub overall_positive_percentage: Option<f64>,
    pub overall_negative_percentage: Option<f64>,
    pub overall_neutral_percentage: Option<f64>,
    pub sentiment_updated_at: Option<DateTime<Utc>>,
}

impl From<LocationRow> for LocationItem {
    fn from(row: LocationRow) -> Self {
        Self {
            location_id: row.location_id,
            name: row.location_name,
            place: row.location_place,
            description: row.location_description,
            entries_count: row.entries_count,
            overall_positive_percentage: row.overall_positive_percentage.and_then(to_f64),
            overall_negative_percentage: row.overall_negative_percentage.and_then(to_f64),
            overall_neutral_percentage: row.overall_neutral_percentage.and_then(to_f64),
            sentiment_updated_at: row.sentiment_updated_at,
        }
    }
}

fn to_f64(value: Decimal) -> Option<f64> {
    value.to_f64()
}

/// GET /api/v1/locations: the catalog with its persisted rollup columns.
pub(super) async fn list_locations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<LocationItem>>>, ApiError> {
    let rows = djournal_db::list_locations(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(LocationItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
