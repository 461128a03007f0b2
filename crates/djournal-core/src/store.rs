//! The storage seam between the engine and whatever persists journals.

use std::future::Future;

use thiserror::Error;

use crate::journal::{EntryText, JournalEntry, Location};
use crate::sentiment::{LocationSentimentRollup, SentimentResult};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("entry {0} not found")]
    EntryNotFound(i64),
}

impl StoreError {
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(error))
    }
}

/// Read/write access to entries, the location catalog, and rollup state.
///
/// Implementations must return a consistent snapshot per call; the engine
/// does not cache anything across calls.
pub trait JournalStore: Send + Sync {
    /// Text of every entry, for the catalog-wide recommender.
    fn fetch_entry_texts(&self) -> impl Future<Output = Result<Vec<EntryText>, StoreError>> + Send;

    /// The full location catalog.
    fn fetch_locations(&self) -> impl Future<Output = Result<Vec<Location>, StoreError>> + Send;

    /// Entries written by one user, across all of their journals.
    fn fetch_entries_for_user(
        &self,
        user_id: i64,
    ) -> impl Future<Output = Result<Vec<JournalEntry>, StoreError>> + Send;

    /// Entries that carry a location id or a free-text location name.
    fn fetch_located_entries(
        &self,
    ) -> impl Future<Output = Result<Vec<JournalEntry>, StoreError>> + Send;

    /// Persist a freshly computed sentiment onto an existing entry.
    fn save_entry_sentiment(
        &self,
        entry_id: i64,
        sentiment: &SentimentResult,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace all rollup state with `rollups` in one atomic step.
    ///
    /// Locations absent from `rollups` are reset. Returns the number of
    /// catalog rows written.
    fn replace_location_rollups(
        &self,
        rollups: &[LocationSentimentRollup],
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
