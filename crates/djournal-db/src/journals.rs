//! Database operations for the `journals` table.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `journals` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalRow {
    pub journal_id: i64,
    pub user_id: Option<i64>,
    pub journal_title: String,
    pub journal_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insert a journal and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_journal(
    pool: &PgPool,
    user_id: Option<i64>,
    title: &str,
    date: NaiveDate,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO journals (user_id, journal_title, journal_date) \
         VALUES ($1, $2, $3) \
         RETURNING journal_id",
    )
    .bind(user_id)
    .bind(title)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List journals, newest date first, optionally restricted to one user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_journals(pool: &PgPool, user_id: Option<i64>) -> Result<Vec<JournalRow>, DbError> {
    let rows = match user_id {
        Some(id) => {
            sqlx::query_as::<_, JournalRow>(
                "SELECT journal_id, user_id, journal_title, journal_date, created_at \
                 FROM journals \
                 WHERE user_id = $1 \
                 ORDER BY journal_date DESC, journal_id DESC",
            )
            .bind(id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, JournalRow>(
                "SELECT journal_id, user_id, journal_title, journal_date, created_at \
                 FROM journals \
                 ORDER BY journal_date DESC, journal_id DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
