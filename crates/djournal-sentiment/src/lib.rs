//! Sentiment scoring and keyword-matching recommendation engine.
//!
//! Scores journal entries sentence by sentence against an AFINN-style
//! polarity lexicon, extracts keyword sets, ranks catalog locations by
//! keyword overlap with positively scored entries, and rolls stored entry
//! sentiment up into per-location averages.

pub mod aggregate;
pub mod error;
pub mod keywords;
pub mod recommend;
pub mod scorer;
pub mod service;
pub mod tokenizer;

mod lexicon;

pub use aggregate::{aggregate, aggregate_with, get_or_compute};
pub use error::SentimentError;
pub use keywords::{extract_keywords, is_stopword};
pub use recommend::{recommend, KeywordCatalog};
pub use scorer::{score_text, score_text_detailed, SentenceSentiment, SentimentBreakdown};
pub use service::JournalInsights;
pub use tokenizer::{split_sentences, split_words};
