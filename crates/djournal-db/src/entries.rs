//! Database operations for the `entries` table.

use chrono::{DateTime, Utc};
use djournal_core::{parse_stored_list, EntryText, JournalEntry, SentimentLabel, SentimentResult};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::percent::{to_decimal, to_f64};
use crate::DbError;

const ENTRY_COLUMNS: &str = "e.entry_id, e.journal_id, e.entry_description, e.entry_datetime, \
     e.sentiment, e.positive_percentage, e.negative_percentage, e.neutral_percentage, \
     e.entry_location, e.entry_location_name, e.entry_images, e.display_on_map, \
     e.created_at, e.updated_at";

/// A row from the `entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRow {
    pub entry_id: i64,
    pub journal_id: i64,
    pub entry_description: String,
    pub entry_datetime: DateTime<Utc>,
    pub sentiment: Option<String>,
    pub positive_percentage: Option<Decimal>,
    pub negative_percentage: Option<Decimal>,
    pub neutral_percentage: Option<Decimal>,
    pub entry_location: Option<i64>,
    pub entry_location_name: Option<String>,
    pub entry_images: String,
    pub display_on_map: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryRow {
    /// Stored image paths. A malformed column is logged and read as empty.
    #[must_use]
    pub fn images(&self) -> Vec<String> {
        parse_stored_list("entry_images", Some(&self.entry_images))
    }

    /// The stored sentiment, if the row carries a complete and valid one.
    #[must_use]
    pub fn stored_sentiment(&self) -> Option<SentimentResult> {
        let label = self.sentiment.as_deref()?;
        let label = match label.parse::<SentimentLabel>() {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(entry_id = self.entry_id, error = %e, "ignoring stored sentiment");
                return None;
            }
        };
        Some(SentimentResult {
            label,
            positive_percentage: to_f64(self.positive_percentage?),
            negative_percentage: to_f64(self.negative_percentage?),
            neutral_percentage: to_f64(self.neutral_percentage?),
        })
    }

    #[must_use]
    pub fn into_journal_entry(self) -> JournalEntry {
        let stored_sentiment = self.stored_sentiment();
        JournalEntry {
            id: Some(self.entry_id),
            text: self.entry_description,
            location_id: self.entry_location,
            location_name: self.entry_location_name,
            display_flag: self.display_on_map,
            stored_sentiment,
        }
    }
}

/// Values for inserting or fully updating an entry. `sentiment` is
/// computed by the caller from `description`.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub journal_id: i64,
    pub description: String,
    pub entry_datetime: DateTime<Utc>,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub images: Vec<String>,
    pub display_on_map: Option<bool>,
    pub sentiment: SentimentResult,
}

struct SentimentColumns {
    label: &'static str,
    positive: Decimal,
    negative: Decimal,
    neutral: Decimal,
}

impl SentimentColumns {
    fn from_result(sentiment: &SentimentResult) -> Result<Self, DbError> {
        Ok(Self {
            label: sentiment.label.as_str(),
            positive: to_decimal(sentiment.positive_percentage)?,
            negative: to_decimal(sentiment.negative_percentage)?,
            neutral: to_decimal(sentiment.neutral_percentage)?,
        })
    }
}

/// Insert an entry and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, or
/// [`DbError::InvalidPercentage`] if the sentiment is out of range.
pub async fn insert_entry(pool: &PgPool, entry: &NewEntry) -> Result<i64, DbError> {
    let sentiment = SentimentColumns::from_result(&entry.sentiment)?;
    let images = serde_json::to_string(&entry.images)?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO entries \
             (journal_id, entry_description, entry_datetime, sentiment, \
              positive_percentage, negative_percentage, neutral_percentage, \
              entry_location, entry_location_name, entry_images, display_on_map) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING entry_id",
    )
    .bind(entry.journal_id)
    .bind(&entry.description)
    .bind(entry.entry_datetime)
    .bind(sentiment.label)
    .bind(sentiment.positive)
    .bind(sentiment.negative)
    .bind(sentiment.neutral)
    .bind(entry.location_id)
    .bind(&entry.location_name)
    .bind(images)
    .bind(entry.display_on_map)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Overwrite every mutable column of an existing entry.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no entry has `entry_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_entry(pool: &PgPool, entry_id: i64, entry: &NewEntry) -> Result<(), DbError> {
    let sentiment = SentimentColumns::from_result(&entry.sentiment)?;
    let images = serde_json::to_string(&entry.images)?;

    let rows = sqlx::query(
        "UPDATE entries SET \
             journal_id = $1, entry_description = $2, entry_datetime = $3, sentiment = $4, \
             positive_percentage = $5, negative_percentage = $6, neutral_percentage = $7, \
             entry_location = $8, entry_location_name = $9, entry_images = $10, \
             display_on_map = $11, updated_at = NOW() \
         WHERE entry_id = $12",
    )
    .bind(entry.journal_id)
    .bind(&entry.description)
    .bind(entry.entry_datetime)
    .bind(sentiment.label)
    .bind(sentiment.positive)
    .bind(sentiment.negative)
    .bind(sentiment.neutral)
    .bind(entry.location_id)
    .bind(&entry.location_name)
    .bind(images)
    .bind(entry.display_on_map)
    .bind(entry_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Delete an entry.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no entry has `entry_id`.
pub async fn delete_entry(pool: &PgPool, entry_id: i64) -> Result<(), DbError> {
    let rows = sqlx::query("DELETE FROM entries WHERE entry_id = $1")
        .bind(entry_id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// List the entries of one journal, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_entries_for_journal(
    pool: &PgPool,
    journal_id: i64,
) -> Result<Vec<EntryRow>, DbError> {
    let rows = sqlx::query_as::<_, EntryRow>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries e \
         WHERE e.journal_id = $1 \
         ORDER BY e.entry_datetime, e.entry_id"
    ))
    .bind(journal_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Description text of every entry.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_entry_texts(pool: &PgPool) -> Result<Vec<EntryText>, DbError> {
    let texts: Vec<String> =
        sqlx::query_scalar("SELECT entry_description FROM entries ORDER BY entry_id")
            .fetch_all(pool)
            .await?;

    Ok(texts.into_iter().map(|text| EntryText { text }).collect())
}

/// Every entry in journals owned by `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_entries_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<EntryRow>, DbError> {
    let rows = sqlx::query_as::<_, EntryRow>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries e \
         JOIN journals j ON j.journal_id = e.journal_id \
         WHERE j.user_id = $1 \
         ORDER BY e.entry_id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Entries with a location id or a non-blank free-text location name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_located_entries(pool: &PgPool) -> Result<Vec<EntryRow>, DbError> {
    let rows = sqlx::query_as::<_, EntryRow>(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries e \
         WHERE e.entry_location IS NOT NULL \
            OR NULLIF(TRIM(e.entry_location_name), '') IS NOT NULL \
         ORDER BY e.entry_id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Write a computed sentiment onto an existing entry.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no entry has `entry_id`.
pub async fn save_entry_sentiment(
    pool: &PgPool,
    entry_id: i64,
    sentiment: &SentimentResult,
) -> Result<(), DbError> {
    let columns = SentimentColumns::from_result(sentiment)?;

    let rows = sqlx::query(
        "UPDATE entries SET \
             sentiment = $1, positive_percentage = $2, negative_percentage = $3, \
             neutral_percentage = $4, updated_at = NOW() \
         WHERE entry_id = $5",
    )
    .bind(columns.label)
    .bind(columns.positive)
    .bind(columns.negative)
    .bind(columns.neutral)
    .bind(entry_id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
