//! Sentence and word splitting.

use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?\n]").expect("valid regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Split text into sentences on `.`, `!`, `?`, and newline.
///
/// Pieces that are exactly empty or a single space are dropped. Any other
/// whitespace-only piece is kept and counts as a sentence.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_BOUNDARY
        .split(text)
        .filter(|piece| !piece.is_empty() && *piece != " ")
}

/// Split a sentence into word tokens (runs of word characters), preserving case.
///
/// Apostrophes split like any other punctuation: `don't` yields `don`, `t`.
pub fn split_words(sentence: &str) -> impl Iterator<Item = &str> {
    WORD.find_iter(sentence).map(|m| m.as_str())
}
