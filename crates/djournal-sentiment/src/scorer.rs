//! Sentence-level lexicon scoring with cumulative classification counts.
//!
//! Each sentence is classified positive, negative, or neutral from its
//! floored polarity. The counters are never reset between sentences, so the
//! percentages attached to sentence *n* describe sentences `1..=n`, and the
//! overall result is simply the state after the last sentence.

use djournal_core::{SentimentLabel, SentimentResult};
use serde::Serialize;

use crate::error::SentimentError;
use crate::lexicon;
use crate::tokenizer::{split_sentences, split_words};

/// Score of one sentence plus the running breakdown after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceSentiment {
    pub sentence: String,
    /// Polarity floored to one decimal place.
    pub score: f64,
    /// Classification of this sentence alone.
    pub class: SentimentLabel,
    /// Cumulative label and percentages over every sentence so far.
    pub running: SentimentResult,
}

/// Full scoring trace for a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub overall: SentimentResult,
    pub positive_sentences: usize,
    pub negative_sentences: usize,
    pub neutral_sentences: usize,
    pub sentences: Vec<SentenceSentiment>,
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningCounts {
    positive: usize,
    negative: usize,
    neutral: usize,
}

impl RunningCounts {
    fn record(&mut self, class: SentimentLabel) {
        match class {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    fn total(self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Only called after at least one sentence has been recorded.
    fn snapshot(self) -> SentimentResult {
        let total = self.total();
        SentimentResult {
            label: SentimentLabel::from_counts(self.positive, self.negative),
            positive_percentage: percentage(self.positive, total),
            negative_percentage: percentage(self.negative, total),
            neutral_percentage: percentage(self.neutral, total),
        }
    }
}

/// Score `text` and return the overall classification.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyText`] if `text` contains no sentences.
pub fn score_text(text: &str) -> Result<SentimentResult, SentimentError> {
    score_text_detailed(text).map(|breakdown| breakdown.overall)
}

/// Score `text` and return per-sentence detail alongside the overall result.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyText`] if `text` contains no sentences.
pub fn score_text_detailed(text: &str) -> Result<SentimentBreakdown, SentimentError> {
    let mut counts = RunningCounts::default();
    let mut sentences = Vec::new();

    for sentence in split_sentences(text) {
        let score = floor_to_tenth(polarity(split_words(sentence)));
        let class = classify(score);
        counts.record(class);
        let running = counts.snapshot();

        tracing::trace!(
            sentence,
            score,
            class = %class,
            positive = counts.positive,
            negative = counts.negative,
            neutral = counts.neutral,
            "scored sentence"
        );

        sentences.push(SentenceSentiment {
            sentence: sentence.to_string(),
            score,
            class,
            running,
        });
    }

    if counts.total() == 0 {
        return Err(SentimentError::EmptyText);
    }

    let overall = counts.snapshot();
    tracing::debug!(
        sentiment = %overall.label,
        positive = overall.positive_percentage,
        negative = overall.negative_percentage,
        neutral = overall.neutral_percentage,
        sentences = counts.total(),
        "scored text"
    );

    Ok(SentimentBreakdown {
        overall,
        positive_sentences: counts.positive,
        negative_sentences: counts.negative,
        neutral_sentences: counts.neutral,
        sentences,
    })
}

/// Mean lexicon weight per token. A negation flips every later hit in the
/// sentence. Sentences without tokens score `0.0`.
fn polarity<'a>(tokens: impl Iterator<Item = &'a str>) -> f64 {
    let mut sum = 0_i32;
    let mut token_count = 0_usize;
    let mut negator = 1_i32;

    for token in tokens {
        token_count += 1;
        let lower = token.to_lowercase();
        if lexicon::is_negation(&lower) {
            negator = -1;
        } else if let Some(weight) = lexicon::weight(&lower) {
            sum += negator * weight;
        }
    }

    if token_count == 0 {
        return 0.0;
    }
    f64::from(sum) / usize_to_f64(token_count)
}

fn floor_to_tenth(score: f64) -> f64 {
    (score * 10.0).floor() / 10.0
}

fn classify(score: f64) -> SentimentLabel {
    if score > 0.0 {
        SentimentLabel::Positive
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    round2(usize_to_f64(part) / usize_to_f64(total) * 100.0)
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn usize_to_f64(n: usize) -> f64 {
    n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_then_neutral_sentence_is_a_neutral_tie() {
        let result = score_text("I love this beach. It was okay.").unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.positive_percentage, 50.0);
        assert_eq!(result.negative_percentage, 0.0);
        assert_eq!(result.neutral_percentage, 50.0);
    }

    #[test]
    fn running_percentages_are_cumulative() {
        let breakdown = score_text_detailed("I love this beach. It was okay.").unwrap();
        assert_eq!(breakdown.sentences.len(), 2);

        let first = &breakdown.sentences[0];
        assert_eq!(first.sentence, "I love this beach");
        assert_eq!(first.score, 0.5);
        assert_eq!(first.class, SentimentLabel::Positive);
        assert_eq!(first.running.label, SentimentLabel::Positive);
        assert_eq!(first.running.positive_percentage, 100.0);

        let second = &breakdown.sentences[1];
        assert_eq!(second.class, SentimentLabel::Neutral);
        assert_eq!(second.running, breakdown.overall);
    }

    #[test]
    fn sentence_counts_sum_to_sentences_processed() {
        let text = "Great food! Terrible traffic. We walked.\nThe sunset was amazing?  ";
        let breakdown = score_text_detailed(text).unwrap();
        let total = breakdown.positive_sentences
            + breakdown.negative_sentences
            + breakdown.neutral_sentences;
        assert_eq!(total, breakdown.sentences.len());
        assert_eq!(total, 5);
    }

    #[test]
    fn whitespace_only_sentence_counts_as_neutral() {
        let breakdown = score_text_detailed("Amazing.  .").unwrap();
        assert_eq!(breakdown.sentences.len(), 2);
        assert_eq!(breakdown.sentences[1].sentence, "  ");
        assert_eq!(breakdown.neutral_sentences, 1);
    }

    #[test]
    fn scoring_is_deterministic() {
        let text = "The market was crowded. The mangoes were wonderful! We will return.";
        assert_eq!(score_text(text).unwrap(), score_text(text).unwrap());
    }

    #[test]
    fn negative_majority_is_negative() {
        let result = score_text("The hotel was dirty. The staff were rude. Breakfast was good.").unwrap();
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.negative_percentage, 66.67);
        assert_eq!(result.positive_percentage, 33.33);
    }

    #[test]
    fn negation_flips_polarity() {
        let result = score_text("The tour was not good").unwrap();
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn everyday_praise_is_positive() {
        for text in [
            "The food was delicious",
            "I recommend this place",
            "The hike was interesting",
        ] {
            let result = score_text(text).unwrap();
            assert_eq!(result.label, SentimentLabel::Positive, "{text}");
        }
    }

    #[test]
    fn contractions_do_not_negate() {
        // tokens are [I, don, t, love, it]
        let breakdown = score_text_detailed("I don't love it").unwrap();
        assert_eq!(breakdown.sentences[0].score, 0.4);
        assert_eq!(breakdown.overall.label, SentimentLabel::Positive);
    }

    #[test]
    fn small_positive_score_floors_to_neutral() {
        // cool (+1) over twelve tokens = 0.08, floored to 0.0
        let breakdown = score_text_detailed(
            "the water near the old pier was cool in the early morning",
        )
        .unwrap();
        assert_eq!(breakdown.sentences[0].score, 0.0);
        assert_eq!(breakdown.overall.label, SentimentLabel::Neutral);
    }

    #[test]
    fn small_negative_score_floors_away_from_zero() {
        // noisy (-1) over twelve tokens = -0.08, floored to -0.1
        let breakdown = score_text_detailed(
            "the street near the old pier was noisy in the early morning",
        )
        .unwrap();
        assert_eq!(breakdown.sentences[0].score, -0.1);
        assert_eq!(breakdown.overall.label, SentimentLabel::Negative);
    }

    #[test]
    fn unknown_words_score_zero() {
        let result = score_text("Quartz basalt granite").unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.neutral_percentage, 100.0);
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(score_text(""), Err(SentimentError::EmptyText)));
        assert!(matches!(score_text("?!."), Err(SentimentError::EmptyText)));
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
    }
}
