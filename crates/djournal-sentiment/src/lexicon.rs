//! AFINN-165 polarity lexicon and negation list.
//!
//! The lexicon is the AFINN-165 word list. Lookups go through the Snowball
//! English stemmer: both the lexicon keys and incoming tokens are stemmed,
//! so inflections such as `recommended` resolve to the weight of their stem.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use rust_stemmers::{Algorithm, Stemmer};

/// AFINN-165: one `word<TAB>weight` entry per line, sorted by word.
const AFINN_EN_165: &str = include_str!("../data/AFINN-en-165.txt");

/// Words that flip the polarity of the next weighted token.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nobody", "nothing", "nowhere", "hardly",
    "scarcely", "barely",
];

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

static STEMMED_LEXICON: LazyLock<HashMap<String, i32>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for line in AFINN_EN_165.lines() {
        let Some((word, score)) = line.split_once('\t') else {
            continue;
        };
        // Multi-word entries can never match a single token.
        if word.contains(char::is_whitespace) {
            continue;
        }
        let Ok(score) = score.trim().parse::<i32>() else {
            continue;
        };
        // Later entries in file order win when two words share a stem.
        map.insert(STEMMER.stem(word).into_owned(), score);
    }
    map
});

static NEGATION_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| NEGATIONS.iter().copied().collect());

/// Weight of a lowercase token, or `None` when the stem is unknown.
pub(crate) fn weight(lower: &str) -> Option<i32> {
    STEMMED_LEXICON.get(STEMMER.stem(lower).as_ref()).copied()
}

pub(crate) fn is_negation(lower: &str) -> bool {
    NEGATION_SET.contains(lower)
}
