//! Journal and entry handlers. Entry descriptions are scored on every write.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use djournal_core::{parse_stored_list, SentimentResult};
use djournal_db::{EntryRow, JournalRow, NewEntry};
use djournal_sentiment::score_text;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, map_sentiment_error, ApiError, ApiResponse, AppState, ResponseMeta};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct CreateJournalRequest {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListJournalsQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EntryRequest {
    pub journal_id: Option<i64>,
    pub description: Option<String>,
    pub entry_datetime: Option<DateTime<Utc>>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// JSON list of already-stored paths to keep on update.
    pub existing_images: Option<String>,
    pub display_on_map: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct JournalItem {
    pub journal_id: i64,
    pub user_id: Option<i64>,
    pub title: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<JournalRow> for JournalItem {
    fn from(row: JournalRow) -> Self {
        Self {
            journal_id: row.journal_id,
            user_id: row.user_id,
            title: row.journal_title,
            date: row.journal_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct EntryItem {
    pub entry_id: i64,
    pub journal_id: i64,
    pub description: String,
    pub entry_datetime: DateTime<Utc>,
    pub sentiment: Option<SentimentResult>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub images: Vec<String>,
    pub display_on_map: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EntryRow> for EntryItem {
    fn from(row: EntryRow) -> Self {
        Self {
            sentiment: row.stored_sentiment(),
            images: row.images(),
            entry_id: row.entry_id,
            journal_id: row.journal_id,
            description: row.entry_description,
            entry_datetime: row.entry_datetime,
            location_id: row.entry_location,
            location_name: row.entry_location_name,
            display_on_map: row.display_on_map,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedJournal {
    pub journal_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct SavedEntry {
    pub entry_id: i64,
    pub sentiment: SentimentResult,
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedEntry {
    pub entry_id: i64,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn required<T>(req_id: &str, field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::new(req_id, "validation_error", format!("{field} is required")))
}

fn required_text(req_id: &str, field: &str, value: Option<String>) -> Result<String, ApiError> {
    let value = required(req_id, field, value)?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Keep stored images first, then append new ones, up to `max` in total.
fn merge_images(existing: Option<&str>, new: Vec<String>, max: usize) -> Vec<String> {
    let mut images = parse_stored_list("existing_images", existing);
    images.extend(new);
    if images.len() > max {
        tracing::warn!(
            submitted = images.len(),
            max,
            "dropping entry images beyond the configured maximum"
        );
        images.truncate(max);
    }
    images
}

/// Validate an entry body and score its description.
fn build_entry(
    req_id: &str,
    body: EntryRequest,
    max_images: usize,
) -> Result<NewEntry, ApiError> {
    let journal_id = required(req_id, "journal_id", body.journal_id)?;
    let description = required_text(req_id, "description", body.description)?;
    let entry_datetime = required(req_id, "entry_datetime", body.entry_datetime)?;

    let sentiment =
        score_text(&description).map_err(|e| map_sentiment_error(req_id.to_owned(), &e))?;

    let location_name = body
        .location_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());

    Ok(NewEntry {
        journal_id,
        description,
        entry_datetime,
        location_id: body.location_id,
        location_name,
        images: merge_images(body.existing_images.as_deref(), body.images, max_images),
        display_on_map: body.display_on_map,
        sentiment,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/journals: create a journal.
pub(super) async fn create_journal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateJournalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedJournal>>), ApiError> {
    let rid = &req_id.0;
    let title = required_text(rid, "title", body.title)?;
    let date = required(rid, "date", body.date)?;

    let journal_id = djournal_db::create_journal(&state.pool, body.user_id, &title, date)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(journal_id, "journal created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CreatedJournal { journal_id }, req_id.0)),
    ))
}

/// GET /api/v1/journals: list journals, optionally for one user.
pub(super) async fn list_journals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListJournalsQuery>,
) -> Result<Json<ApiResponse<Vec<JournalItem>>>, ApiError> {
    let rows = djournal_db::list_journals(&state.pool, query.user_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(JournalItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/journals/{journal_id}/entries
pub(super) async fn list_journal_entries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(journal_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<EntryItem>>>, ApiError> {
    let rows = djournal_db::list_entries_for_journal(&state.pool, journal_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(EntryItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/entries: create an entry and store its sentiment.
pub(super) async fn create_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<EntryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SavedEntry>>), ApiError> {
    let rid = &req_id.0;
    let entry = build_entry(rid, body, state.max_entry_images)?;

    let entry_id = djournal_db::insert_entry(&state.pool, &entry)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(entry_id, sentiment = %entry.sentiment.label, "entry created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            SavedEntry {
                entry_id,
                sentiment: entry.sentiment,
                images: entry.images,
            },
            req_id.0,
        )),
    ))
}

/// PUT /api/v1/entries/{entry_id}: replace an entry and rescore it.
pub(super) async fn update_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(entry_id): Path<i64>,
    Json(body): Json<EntryRequest>,
) -> Result<Json<ApiResponse<SavedEntry>>, ApiError> {
    let rid = &req_id.0;
    let entry = build_entry(rid, body, state.max_entry_images)?;

    djournal_db::update_entry(&state.pool, entry_id, &entry)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(entry_id, sentiment = %entry.sentiment.label, "entry updated");

    Ok(Json(ApiResponse::new(
        SavedEntry {
            entry_id,
            sentiment: entry.sentiment,
            images: entry.images,
        },
        req_id.0,
    )))
}

/// DELETE /api/v1/entries/{entry_id}
pub(super) async fn delete_entry(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(entry_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedEntry>>, ApiError> {
    djournal_db::delete_entry(&state.pool, entry_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(entry_id, "entry deleted");

    Ok(Json(ApiResponse::new(DeletedEntry { entry_id }, req_id.0)))
}
