//! Offline text analysis commands.

use djournal_sentiment::{extract_keywords, score_text, score_text_detailed, SentimentBreakdown};

/// Score `text` and print the result.
///
/// # Errors
///
/// Returns an error if `text` contains no sentences.
pub(crate) fn run_score(text: &str, detailed: bool) -> anyhow::Result<()> {
    if detailed {
        let breakdown = score_text_detailed(text)?;
        print!("{}", render_breakdown(&breakdown));
    } else {
        let result = score_text(text)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

pub(crate) fn run_keywords(text: &str) {
    let keywords = extract_keywords(text);
    if keywords.is_empty() {
        println!("(no keywords)");
        return;
    }
    for keyword in keywords {
        println!("{keyword}");
    }
}

fn render_breakdown(breakdown: &SentimentBreakdown) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    for (index, sentence) in breakdown.sentences.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:>5.1}  {:<8}  {}",
            index + 1,
            sentence.score,
            sentence.class.as_str(),
            sentence.sentence.trim()
        );
    }
    let overall = &breakdown.overall;
    let _ = writeln!(
        out,
        "overall: {} (positive {:.2}%, negative {:.2}%, neutral {:.2}%)",
        overall.label,
        overall.positive_percentage,
        overall.negative_percentage,
        overall.neutral_percentage
    );
    out
}
