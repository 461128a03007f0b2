//! Postgres-backed [`JournalStore`].

use djournal_core::{
    EntryText, JournalEntry, JournalStore, Location, LocationSentimentRollup, SentimentResult,
    StoreError,
};
use sqlx::PgPool;

use crate::DbError;

impl From<DbError> for StoreError {
    fn from(error: DbError) -> Self {
        StoreError::backend(error)
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl JournalStore for PgStore {
    async fn fetch_entry_texts(&self) -> Result<Vec<EntryText>, StoreError> {
        Ok(crate::list_entry_texts(&self.pool).await?)
    }

    async fn fetch_locations(&self) -> Result<Vec<Location>, StoreError> {
        let rows = crate::list_locations(&self.pool).await?;
        Ok(rows.into_iter().map(crate::LocationRow::into_location).collect())
    }

    async fn fetch_entries_for_user(&self, user_id: i64) -> Result<Vec<JournalEntry>, StoreError> {
        let rows = crate::list_entries_for_user(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(crate::EntryRow::into_journal_entry).collect())
    }

    async fn fetch_located_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let rows = crate::list_located_entries(&self.pool).await?;
        Ok(rows.into_iter().map(crate::EntryRow::into_journal_entry).collect())
    }

    async fn save_entry_sentiment(
        &self,
        entry_id: i64,
        sentiment: &SentimentResult,
    ) -> Result<(), StoreError> {
        match crate::save_entry_sentiment(&self.pool, entry_id, sentiment).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound) => Err(StoreError::EntryNotFound(entry_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn replace_location_rollups(
        &self,
        rollups: &[LocationSentimentRollup],
    ) -> Result<u64, StoreError> {
        Ok(crate::replace_location_rollups(&self.pool, rollups).await?)
    }
}
