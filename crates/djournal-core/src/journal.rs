//! Journal entries and the location catalog as the engine sees them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentResult;

/// Bare entry text, as consumed by the catalog-wide recommender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryText {
    pub text: String,
}

/// A persisted journal entry with its optional location association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Option<i64>,
    pub text: String,
    pub location_id: Option<i64>,
    pub location_name: Option<String>,
    pub display_flag: Option<bool>,
    /// Sentiment computed when the entry was written. `None` for rows that
    /// predate scoring or were inserted out-of-band.
    pub stored_sentiment: Option<SentimentResult>,
}

/// A catalog location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>,
    pub name: String,
    pub place: String,
    pub description: String,
    /// Keywords previously extracted from `description`, if the caller kept them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_cache: Option<BTreeSet<String>>,
}

impl Location {
    /// Deduplication key: the catalog id when known, otherwise the
    /// lower-cased `name|place` pair.
    #[must_use]
    pub fn unique_key(&self) -> String {
        match self.id {
            Some(id) => format!("id:{id}"),
            None => format!(
                "{}|{}",
                self.name.to_lowercase(),
                self.place.to_lowercase()
            ),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredList {
    Many(Vec<String>),
    One(String),
}

/// Parse a persisted JSON list column (entry images, keyword caches).
///
/// Accepts a JSON array of strings or a single JSON string. `NULL`, blank,
/// and `null` yield an empty list. Anything else is logged and treated as
/// empty rather than failing the caller.
#[must_use]
pub fn parse_stored_list(field: &str, raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Option<StoredList>>(raw) {
        Ok(Some(StoredList::Many(items))) => items,
        Ok(Some(StoredList::One(item))) if item.trim().is_empty() => Vec::new(),
        Ok(Some(StoredList::One(item))) => vec![item],
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(field, error = %e, "malformed stored list; falling back to empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: Option<i64>, name: &str, place: &str) -> Location {
        Location {
            id,
            name: name.to_string(),
            place: place.to_string(),
            description: String::new(),
            keyword_cache: None,
        }
    }

    #[test]
    fn unique_key_prefers_id() {
        assert_eq!(location(Some(4), "Boracay", "Aklan").unique_key(), "id:4");
    }

    #[test]
    fn unique_key_falls_back_to_lowercased_name_and_place() {
        assert_eq!(
            location(None, "White Beach", "Boracay").unique_key(),
            "white beach|boracay"
        );
    }

    #[test]
    fn parse_stored_list_reads_json_array() {
        let parsed = parse_stored_list("entry_images", Some(r#"["/uploads/a.jpg","/uploads/b.png"]"#));
        assert_eq!(parsed, vec!["/uploads/a.jpg", "/uploads/b.png"]);
    }

    #[test]
    fn parse_stored_list_wraps_single_string() {
        let parsed = parse_stored_list("entry_images", Some(r#""/uploads/a.jpg""#));
        assert_eq!(parsed, vec!["/uploads/a.jpg"]);
    }

    #[test]
    fn parse_stored_list_tolerates_missing_and_null() {
        assert!(parse_stored_list("entry_images", None).is_empty());
        assert!(parse_stored_list("entry_images", Some("   ")).is_empty());
        assert!(parse_stored_list("entry_images", Some("null")).is_empty());
    }

    #[test]
    fn parse_stored_list_falls_back_on_malformed_json() {
        assert!(parse_stored_list("keyword_cache", Some("[not json")).is_empty());
        assert!(parse_stored_list("keyword_cache", Some("{\"a\":1}")).is_empty());
    }
}
