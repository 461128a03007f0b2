//! Keyword extraction for entry/location matching.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use crate::tokenizer::split_words;

/// Classic English stopword list. Single letters and digits are covered by
/// the length filter and omitted here.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing", "during",
    "each", "few", "for", "from", "further", "get", "got", "has", "had", "he", "have", "her",
    "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "like", "make", "many", "me", "might", "more", "most", "much", "must", "my", "myself",
    "never", "now", "of", "on", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "said", "same", "see", "should", "since", "so", "some", "still", "such", "take",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "way",
    "we", "well", "were", "what", "where", "when", "which", "while", "who", "whom", "with",
    "would", "why", "you", "your", "yours", "yourself",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Whether `word` (already lower-cased) is a stopword.
#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORD_SET.contains(word)
}

/// Lower-case `text`, split it into words, and keep the ones that are not
/// stopwords and are longer than two characters.
#[must_use]
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let keywords: BTreeSet<String> = split_words(&lowered)
        .filter(|word| word.chars().count() > 2 && !is_stopword(word))
        .map(ToOwned::to_owned)
        .collect();

    tracing::trace!(count = keywords.len(), ?keywords, "extracted keywords");
    keywords
}
