//! Per-location rollup of stored entry sentiment.
//!
//! Rollups are recomputed from every located entry on each call. Nothing is
//! carried over from a previous pass.

use std::collections::{BTreeMap, HashMap};

use djournal_core::{JournalEntry, Location, LocationKey, LocationSentimentRollup, SentimentResult};

use crate::error::SentimentError;
use crate::scorer::{round2, score_text, usize_to_f64};

/// Return the entry's stored sentiment, or score it and hand the fresh
/// result to `on_computed` so the caller can persist it.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyText`] if the entry has no stored
/// sentiment and its text contains no sentences.
pub fn get_or_compute<F>(entry: &JournalEntry, on_computed: F) -> Result<SentimentResult, SentimentError>
where
    F: FnOnce(&SentimentResult),
{
    if let Some(stored) = &entry.stored_sentiment {
        return Ok(stored.clone());
    }
    let computed = score_text(&entry.text)?;
    on_computed(&computed);
    Ok(computed)
}

/// Aggregate without persisting any read-repaired sentiment.
#[must_use]
pub fn aggregate(entries: &[JournalEntry], locations: &[Location]) -> Vec<LocationSentimentRollup> {
    aggregate_with(entries, locations, |_, _| {})
}

/// Group entries by location and average their sentiment percentages.
///
/// The group key is the entry's `location_id`, else its free-text
/// `location_name` resolved case-insensitively against the catalog, else
/// the lower-cased name itself. Entries with neither are skipped, as are
/// entries that have no stored sentiment and cannot be scored.
///
/// `on_repaired` receives `(entry_id, sentiment)` for every entry that had
/// to be scored here and has an id to write back to.
///
/// Output is ordered by `entries_count` descending, then key.
pub fn aggregate_with<F>(
    entries: &[JournalEntry],
    locations: &[Location],
    mut on_repaired: F,
) -> Vec<LocationSentimentRollup>
where
    F: FnMut(i64, &SentimentResult),
{
    let name_index = catalog_name_index(locations);
    let mut groups: BTreeMap<LocationKey, Vec<SentimentResult>> = BTreeMap::new();

    for entry in entries {
        let Some(key) = group_key(entry, &name_index) else {
            continue;
        };

        let sentiment = get_or_compute(entry, |computed| {
            if let Some(id) = entry.id {
                on_repaired(id, computed);
            }
        });

        match sentiment {
            Ok(sentiment) => groups.entry(key).or_default().push(sentiment),
            Err(e) => {
                tracing::warn!(entry_id = ?entry.id, error = %e, "excluding unscorable entry from rollup");
            }
        }
    }

    let mut rollups: Vec<LocationSentimentRollup> = groups
        .into_iter()
        .map(|(location, sentiments)| LocationSentimentRollup {
            location,
            entries_count: sentiments.len(),
            overall_positive_percentage: mean(sentiments.iter().map(|s| s.positive_percentage)),
            overall_negative_percentage: mean(sentiments.iter().map(|s| s.negative_percentage)),
            overall_neutral_percentage: mean(sentiments.iter().map(|s| s.neutral_percentage)),
        })
        .collect();

    // BTreeMap iteration already orders by key; a stable sort keeps that as the tie-break.
    rollups.sort_by(|a, b| b.entries_count.cmp(&a.entries_count));
    rollups
}

fn catalog_name_index(locations: &[Location]) -> HashMap<String, i64> {
    let mut index = HashMap::new();
    for location in locations {
        if let Some(id) = location.id {
            index
                .entry(location.name.trim().to_lowercase())
                .or_insert(id);
        }
    }
    index
}

fn group_key(entry: &JournalEntry, name_index: &HashMap<String, i64>) -> Option<LocationKey> {
    if let Some(id) = entry.location_id {
        return Some(LocationKey::Id(id));
    }
    let name = entry
        .location_name
        .as_deref()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())?;
    Some(match name_index.get(&name) {
        Some(&id) => LocationKey::Id(id),
        None => LocationKey::Name(name),
    })
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    round2(values.sum::<f64>() / usize_to_f64(count))
}
