//! Sentiment records, recommendations, and per-location rollups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Overall polarity class of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Majority of positive vs negative sentence counts. Ties are neutral;
    /// the neutral count never participates.
    #[must_use]
    pub fn from_counts(positive: usize, negative: usize) -> Self {
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Neutral,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            _ => Err(CoreError::InvalidSentimentLabel(s.to_string())),
        }
    }
}

/// Classification and percentage breakdown for one text.
///
/// Percentages are in `[0, 100]` with two-decimal precision and sum to 100
/// up to rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    #[serde(rename = "sentiment")]
    pub label: SentimentLabel,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

/// One ranked location suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub location_id: Option<i64>,
    pub location_name: String,
    pub location_place: String,
    /// Number of keywords shared with the best-matching entry. Always `>= 1`.
    pub match_score: u32,
    pub sentiment: SentimentLabel,
    pub positive_percentage: f64,
}

/// Grouping key for rollups: a catalog id, or the lower-cased free-text
/// name of a location that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LocationKey {
    Id(i64),
    Name(String),
}

impl LocationKey {
    #[must_use]
    pub fn location_id(&self) -> Option<i64> {
        match self {
            LocationKey::Id(id) => Some(*id),
            LocationKey::Name(_) => None,
        }
    }
}

/// Mean sentiment of every entry recorded against one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSentimentRollup {
    pub location: LocationKey,
    pub entries_count: usize,
    pub overall_positive_percentage: f64,
    pub overall_negative_percentage: f64,
    pub overall_neutral_percentage: f64,
}

/// Outcome of a full recompute-and-persist rollup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecomputeSummary {
    /// Catalog locations whose rollup row was written.
    pub locations_updated: u64,
    /// Entries that had no stored sentiment and were scored during the pass.
    pub entries_repaired: usize,
}
