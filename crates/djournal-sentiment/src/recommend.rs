//! Keyword-overlap location recommendations for positive entries.

use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use djournal_core::{Location, Recommendation, SentimentLabel};

use crate::error::SentimentError;
use crate::keywords::extract_keywords;
use crate::scorer::score_text;

/// Location keyword sets computed once per recommendation pass.
///
/// A location's `keyword_cache` is used as-is when present; otherwise its
/// description is run through [`extract_keywords`].
#[derive(Debug)]
pub struct KeywordCatalog<'a> {
    items: Vec<(&'a Location, Cow<'a, BTreeSet<String>>)>,
}

impl<'a> KeywordCatalog<'a> {
    #[must_use]
    pub fn build(locations: &'a [Location]) -> Self {
        let items = locations
            .iter()
            .map(|location| {
                let keywords = match &location.keyword_cache {
                    Some(cached) => Cow::Borrowed(cached),
                    None => Cow::Owned(extract_keywords(&location.description)),
                };
                (location, keywords)
            })
            .collect();
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Location, &BTreeSet<String>)> {
        self.items.iter().map(|(loc, kw)| (*loc, kw.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rank catalog locations against the positive entries in `entries`.
///
/// Entries whose overall sentiment is not positive contribute nothing. Each
/// remaining entry scores every location by the number of keywords it
/// shares with the location; zero-overlap matches are dropped. A location
/// matched by several entries keeps only its best score. Output is sorted
/// by `match_score` descending, then name, place, and id ascending.
pub fn recommend<'e>(
    entries: impl IntoIterator<Item = &'e str>,
    locations: &[Location],
) -> Vec<Recommendation> {
    let catalog = KeywordCatalog::build(locations);
    let mut best: HashMap<String, Recommendation> = HashMap::new();

    for text in entries {
        let sentiment = match score_text(text) {
            Ok(sentiment) => sentiment,
            Err(SentimentError::EmptyText) => {
                tracing::debug!("skipping entry with no scorable text");
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping entry that failed to score");
                continue;
            }
        };

        if sentiment.label != SentimentLabel::Positive {
            tracing::debug!(sentiment = %sentiment.label, "skipping non-positive entry");
            continue;
        }

        let entry_keywords = extract_keywords(text);
        if entry_keywords.is_empty() {
            continue;
        }

        for (location, location_keywords) in catalog.iter() {
            let overlap = entry_keywords.intersection(location_keywords).count();
            if overlap == 0 {
                continue;
            }
            let match_score = u32::try_from(overlap).unwrap_or(u32::MAX);

            tracing::debug!(
                location = %location.name,
                match_score,
                "location matched entry keywords"
            );

            let candidate = Recommendation {
                location_id: location.id,
                location_name: location.name.clone(),
                location_place: location.place.clone(),
                match_score,
                sentiment: sentiment.label,
                positive_percentage: sentiment.positive_percentage,
            };

            match best.entry(location.unique_key()) {
                Entry::Occupied(mut slot) => {
                    if candidate.match_score > slot.get().match_score {
                        slot.insert(candidate);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
            }
        }
    }

    let mut ranked: Vec<Recommendation> = best.into_values().collect();
    ranked.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| a.location_name.cmp(&b.location_name))
            .then_with(|| a.location_place.cmp(&b.location_place))
            .then_with(|| a.location_id.cmp(&b.location_id))
    });

    tracing::debug!(count = ranked.len(), "recommendations ranked");
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: Option<i64>, name: &str, place: &str, description: &str) -> Location {
        Location {
            id,
            name: name.to_string(),
            place: place.to_string(),
            description: description.to_string(),
            keyword_cache: None,
        }
    }

    #[test]
    fn keeps_highest_score_when_several_entries_match() {
        let locations = vec![location(
            Some(1),
            "Kawasan Falls",
            "Cebu",
            "waterfall canyon swimming turquoise lagoon jungle trek",
        )];
        let entries = [
            "Amazing waterfall and lagoon",
            "Wonderful waterfall canyon swimming turquoise lagoon",
        ];

        let ranked = recommend(entries, &locations);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].location_id, Some(1));
        assert_eq!(ranked[0].match_score, 5);
    }

    #[test]
    fn non_positive_entries_never_recommend() {
        let locations = vec![location(None, "Night Market", "Davao", "crowded noisy market food")];
        let entries = [
            "The market was crowded and noisy",
            "We bought food at the market",
        ];

        assert!(recommend(entries, &locations).is_empty());
    }

    #[test]
    fn zero_overlap_locations_are_dropped() {
        let locations = vec![
            location(None, "Mount Apo", "Davao", "volcano summit hike"),
            location(None, "Island Hopping", "Palawan", "boat lagoon snorkel"),
        ];

        let ranked = recommend(["Loved the boat ride"], &locations);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].location_name, "Island Hopping");
        assert!(ranked.iter().all(|r| r.match_score > 0));
    }

    #[test]
    fn ordered_by_score_then_name() {
        let locations = vec![
            location(None, "Zamboanga Pier", "Zamboanga", "sunset boat"),
            location(None, "Alona Beach", "Bohol", "sunset boat"),
            location(None, "Coron Lagoon", "Palawan", "sunset boat lagoon"),
        ];

        let ranked = recommend(["Beautiful sunset from the boat near the lagoon"], &locations);

        let names: Vec<&str> = ranked.iter().map(|r| r.location_name.as_str()).collect();
        assert_eq!(names, vec!["Coron Lagoon", "Alona Beach", "Zamboanga Pier"]);
        assert_eq!(ranked[0].match_score, 3);
        assert_eq!(ranked[1].match_score, 2);
    }

    #[test]
    fn dedupes_by_case_insensitive_name_and_place_without_ids() {
        let locations = vec![
            location(None, "Chocolate Hills", "Bohol", "hills view"),
            location(None, "CHOCOLATE HILLS", "bohol", "hills view deck"),
        ];

        let ranked = recommend(["Great view from the hills deck"], &locations);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 3);
    }

    #[test]
    fn uses_keyword_cache_when_present() {
        let mut cached = location(Some(9), "Siargao", "Surigao", "nothing useful here");
        cached.keyword_cache = Some(["surf".to_string()].into_iter().collect());

        let ranked = recommend(["Awesome surf all day"], &[cached]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 1);
    }

    #[test]
    fn empty_entries_are_skipped() {
        let locations = vec![location(None, "Anywhere", "Here", "beach")];
        assert!(recommend(["", "..."], &locations).is_empty());
    }

    #[test]
    fn carries_sentiment_of_matching_entry() {
        let locations = vec![location(Some(3), "Banaue", "Ifugao", "rice terraces")];
        let ranked = recommend(["The rice terraces were stunning"], &locations);
        assert_eq!(ranked[0].sentiment, SentimentLabel::Positive);
        assert_eq!(ranked[0].positive_percentage, 100.0);
    }
}
