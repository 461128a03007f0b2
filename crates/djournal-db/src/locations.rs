//! Database operations for the `locations` catalog and its rollup columns.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use djournal_core::{parse_stored_list, Location, LocationSentimentRollup};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::percent::to_decimal;
use crate::DbError;

/// A row from the `locations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub location_id: i64,
    pub location_name: String,
    pub location_place: String,
    pub location_description: String,
    pub keyword_cache: Option<String>,
    pub entries_count: i32,
    pub overall_positive_percentage: Option<Decimal>,
    pub overall_negative_percentage: Option<Decimal>,
    pub overall_neutral_percentage: Option<Decimal>,
    pub sentiment_updated_at: Option<DateTime<Utc>>,
}

impl LocationRow {
    /// Convert to the engine's view of a location.
    ///
    /// A missing, empty, or unreadable keyword cache becomes `None`, so the
    /// matcher re-extracts keywords from the description.
    #[must_use]
    pub fn into_location(self) -> Location {
        let keyword_cache = self.keyword_cache.as_deref().and_then(|raw| {
            let cached: BTreeSet<String> = parse_stored_list("keyword_cache", Some(raw))
                .into_iter()
                .collect();
            (!cached.is_empty()).then_some(cached)
        });

        Location {
            id: Some(self.location_id),
            name: self.location_name,
            place: self.location_place,
            description: self.location_description,
            keyword_cache,
        }
    }
}

/// List the full catalog ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_locations(pool: &PgPool) -> Result<Vec<LocationRow>, DbError> {
    let rows = sqlx::query_as::<_, LocationRow>(
        "SELECT location_id, location_name, location_place, location_description, \
                keyword_cache, entries_count, overall_positive_percentage, \
                overall_negative_percentage, overall_neutral_percentage, sentiment_updated_at \
         FROM locations \
         ORDER BY location_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Store pre-extracted keyword sets as JSON arrays in `keyword_cache`.
///
/// Returns the number of rows updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_location_keyword_caches(
    pool: &PgPool,
    caches: &[(i64, BTreeSet<String>)],
) -> Result<u64, DbError> {
    if caches.is_empty() {
        return Ok(0);
    }

    let mut ids: Vec<i64> = Vec::with_capacity(caches.len());
    let mut payloads: Vec<String> = Vec::with_capacity(caches.len());
    for (id, keywords) in caches {
        ids.push(*id);
        payloads.push(serde_json::to_string(keywords)?);
    }

    let rows = sqlx::query(
        "UPDATE locations AS l SET keyword_cache = v.keyword_cache \
         FROM UNNEST($1::int8[], $2::text[]) AS v(location_id, keyword_cache) \
         WHERE l.location_id = v.location_id",
    )
    .bind(&ids)
    .bind(&payloads)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows)
}

/// Replace every location's rollup columns in one transaction.
///
/// All catalog rows are first reset (zero entries, `NULL` percentages), then
/// the rollups keyed by a catalog id are written. Name-keyed rollups have no
/// catalog row and are skipped. Any failure rolls the whole replacement back.
///
/// Returns the number of catalog rows that received a rollup.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails, or
/// [`DbError::InvalidPercentage`] before the transaction starts if a rollup
/// percentage is out of range.
pub async fn replace_location_rollups(
    pool: &PgPool,
    rollups: &[LocationSentimentRollup],
) -> Result<u64, DbError> {
    let mut ids: Vec<i64> = Vec::with_capacity(rollups.len());
    let mut counts: Vec<i32> = Vec::with_capacity(rollups.len());
    let mut positives: Vec<Decimal> = Vec::with_capacity(rollups.len());
    let mut negatives: Vec<Decimal> = Vec::with_capacity(rollups.len());
    let mut neutrals: Vec<Decimal> = Vec::with_capacity(rollups.len());

    for rollup in rollups {
        let Some(id) = rollup.location.location_id() else {
            continue;
        };
        ids.push(id);
        counts.push(i32::try_from(rollup.entries_count).unwrap_or(i32::MAX));
        positives.push(to_decimal(rollup.overall_positive_percentage)?);
        negatives.push(to_decimal(rollup.overall_negative_percentage)?);
        neutrals.push(to_decimal(rollup.overall_neutral_percentage)?);
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE locations SET \
             entries_count = 0, \
             overall_positive_percentage = NULL, \
             overall_negative_percentage = NULL, \
             overall_neutral_percentage = NULL, \
             sentiment_updated_at = NOW()",
    )
    .execute(&mut *tx)
    .await?;

    let written = sqlx::query(
        "UPDATE locations AS l SET \
             entries_count = v.entries_count, \
             overall_positive_percentage = v.positive, \
             overall_negative_percentage = v.negative, \
             overall_neutral_percentage = v.neutral, \
             sentiment_updated_at = NOW() \
         FROM UNNEST($1::int8[], $2::int4[], $3::numeric[], $4::numeric[], $5::numeric[]) \
              AS v(location_id, entries_count, positive, negative, neutral) \
         WHERE l.location_id = v.location_id",
    )
    .bind(&ids)
    .bind(&counts)
    .bind(&positives)
    .bind(&negatives)
    .bind(&neutrals)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;
    Ok(written)
}
