//! Store-backed entry points: recommendations and rollup passes.

use djournal_core::{
    JournalStore, LocationSentimentRollup, Recommendation, RecomputeSummary, SentimentResult,
};
use tokio::sync::Mutex;

use crate::aggregate::aggregate_with;
use crate::error::SentimentError;
use crate::recommend::recommend;

/// Runs the engine against a [`JournalStore`].
///
/// Full rollup replacement is serialised through an internal lock, so a
/// scheduled run and an on-demand run never interleave their writes. Share
/// one instance (behind an `Arc`) between every caller that can trigger a
/// recompute.
pub struct JournalInsights<S> {
    store: S,
    rollup_lock: Mutex<()>,
}

impl<S: JournalStore> JournalInsights<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rollup_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recommend catalog locations from every entry in the store.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Store`] if entries or locations cannot be read.
    pub async fn recommend(&self) -> Result<Vec<Recommendation>, SentimentError> {
        let entries = self.store.fetch_entry_texts().await?;
        let locations = self.store.fetch_locations().await?;
        tracing::debug!(
            entries = entries.len(),
            locations = locations.len(),
            "computing catalog-wide recommendations"
        );
        Ok(recommend(
            entries.iter().map(|e| e.text.as_str()),
            &locations,
        ))
    }

    /// Recommend catalog locations from one user's entries.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Store`] if entries or locations cannot be read.
    pub async fn recommend_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<Recommendation>, SentimentError> {
        let entries = self.store.fetch_entries_for_user(user_id).await?;
        let locations = self.store.fetch_locations().await?;
        tracing::debug!(
            user_id,
            entries = entries.len(),
            locations = locations.len(),
            "computing user recommendations"
        );
        Ok(recommend(
            entries.iter().map(|e| e.text.as_str()),
            &locations,
        ))
    }

    /// Compute per-location rollups without replacing persisted rollup state.
    ///
    /// Entries missing stored sentiment are scored and written back.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Store`] if entries or locations cannot be read.
    pub async fn aggregate_sentiments(
        &self,
    ) -> Result<Vec<LocationSentimentRollup>, SentimentError> {
        let (rollups, _) = self.compute_rollups().await?;
        Ok(rollups)
    }

    /// Recompute every rollup from scratch and atomically replace the stored set.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Store`] if reading fails or the replacement
    /// is rolled back.
    pub async fn recompute_and_persist(&self) -> Result<RecomputeSummary, SentimentError> {
        let _guard = self.rollup_lock.lock().await;

        let (rollups, entries_repaired) = self.compute_rollups().await?;
        let locations_updated = self.store.replace_location_rollups(&rollups).await?;

        tracing::info!(
            groups = rollups.len(),
            locations_updated,
            entries_repaired,
            "location sentiment rollups replaced"
        );

        Ok(RecomputeSummary {
            locations_updated,
            entries_repaired,
        })
    }

    async fn compute_rollups(
        &self,
    ) -> Result<(Vec<LocationSentimentRollup>, usize), SentimentError> {
        let entries = self.store.fetch_located_entries().await?;
        let locations = self.store.fetch_locations().await?;

        let mut repairs: Vec<(i64, SentimentResult)> = Vec::new();
        let rollups = aggregate_with(&entries, &locations, |id, sentiment| {
            repairs.push((id, sentiment.clone()));
        });

        let repaired = repairs.len();
        for (entry_id, sentiment) in &repairs {
            if let Err(e) = self.store.save_entry_sentiment(*entry_id, sentiment).await {
                tracing::warn!(entry_id, error = %e, "failed to persist repaired entry sentiment");
            }
        }

        Ok((rollups, repaired))
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
