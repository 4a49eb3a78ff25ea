// crates/core/src/pipeline.rs
//! Scoring pipeline: tokens → scores → moving average.
//!
//! [`SentimentSeries`] keeps the three sequences side by side. They always
//! have the same length and index `i` of each refers to the same word, which
//! is what every report and the chart rely on.

use std::path::PathBuf;

use tracing::info;

use crate::error::SentimentError;
use crate::lexicon::{Lexicon, LexiconSource};
use crate::moving_average::{moving_average_with, WarmupPolicy, Window};
use crate::scorer::score_tokens;
use crate::tokenizer::tokenize_file;

/// Position-aligned tokens, scores and moving averages of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSeries {
    tokens: Vec<String>,
    scores: Vec<i32>,
    averages: Vec<f64>,
    window: Window,
    warmup: WarmupPolicy,
}

/// Score `tokens` against `lexicon` and smooth the scores over `window`.
pub fn analyze(
    tokens: Vec<String>,
    lexicon: &Lexicon,
    window: Window,
    warmup: WarmupPolicy,
) -> SentimentSeries {
    let scores = score_tokens(&tokens, lexicon);
    let averages = moving_average_with(&scores, window, warmup);
    debug_assert_eq!(tokens.len(), scores.len());
    debug_assert_eq!(scores.len(), averages.len());

    let series = SentimentSeries {
        tokens,
        scores,
        averages,
        window,
        warmup,
    };
    let summary = series.summary();
    info!(
        tokens = summary.tokens,
        scored = summary.scored,
        window = %window,
        warmup = %warmup,
        "Document scored"
    );
    series
}

/// Load the lexicon, read the document and score it.
///
/// Returns the resolved document path with the series. Any failure while
/// loading or reading aborts the run before anything is scored.
pub fn score_document(
    document: &str,
    source: &dyn LexiconSource,
    window: Window,
    warmup: WarmupPolicy,
) -> Result<(PathBuf, SentimentSeries), SentimentError> {
    info!(source = %source.describe(), "Loading lexicon");
    let lexicon = source.load()?;
    let (path, tokens) = tokenize_file(document)?;
    Ok((path, analyze(tokens, &lexicon, window, warmup)))
}

impl SentimentSeries {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn warmup(&self) -> WarmupPolicy {
        self.warmup
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Aggregate figures for the whole document.
    pub fn summary(&self) -> SeriesSummary {
        let steady = self.averages.get(self.window.get()..).unwrap_or(&[]);
        let min_average = steady.iter().copied().filter(|v| v.is_finite()).reduce(f64::min);
        let max_average = steady.iter().copied().filter(|v| v.is_finite()).reduce(f64::max);

        SeriesSummary {
            tokens: self.tokens.len(),
            scored: self.scores.iter().filter(|s| **s != 0).count(),
            positive_total: self.scores.iter().filter(|s| **s > 0).map(|s| i64::from(*s)).sum(),
            negative_total: self.scores.iter().filter(|s| **s < 0).map(|s| i64::from(*s)).sum(),
            min_average,
            max_average,
        }
    }

    /// Every word that carried a nonzero score, in document order.
    pub fn scored_words(&self) -> Vec<ScoredWord<'_>> {
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, score)| **score != 0)
            .map(|(index, score)| ScoredWord {
                index,
                token: &self.tokens[index],
                score: *score,
                average: self.averages[index],
            })
            .collect()
    }
}

/// Aggregate figures for a [`SentimentSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub tokens: usize,
    /// Tokens with a nonzero score.
    pub scored: usize,
    pub positive_total: i64,
    pub negative_total: i64,
    /// Extremes of the moving average once the window is full; `None` when
    /// the document is not longer than the window.
    pub min_average: Option<f64>,
    pub max_average: Option<f64>,
}

/// One sentiment-bearing word and where it sits in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredWord<'a> {
    pub index: usize,
    pub token: &'a str,
    pub score: i32,
    pub average: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_text;
    use pretty_assertions::assert_eq;

    fn series(text: &str, window: i64) -> SentimentSeries {
        let lexicon: Lexicon = [("great", 3), ("awful", -3), ("good", 2)].into_iter().collect();
        analyze(tokenize_text(text), &lexicon, Window::new(window).unwrap(), WarmupPolicy::Zero)
    }

    #[test]
    fn test_analyze_reference_document() {
        let s = series("I feel great! Really great.", 2);
        assert_eq!(s.tokens(), &["I", "feel", "great", "Really", "great"]);
        assert_eq!(s.scores(), &[0, 0, 3, 0, 3]);
        assert_eq!(s.averages(), &[0.0, 0.0, 0.0, 1.5, 1.5]);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn test_sequences_stay_aligned_with_empty_tokens() {
        let s = series("good -- awful ... great", 1);
        assert_eq!(s.tokens().len(), 5);
        assert_eq!(s.scores().len(), 5);
        assert_eq!(s.averages().len(), 5);
        assert_eq!(s.tokens()[1], "");
    }

    #[test]
    fn test_summary() {
        let s = series("good awful great nothing good", 2);
        let summary = s.summary();
        assert_eq!(summary.tokens, 5);
        assert_eq!(summary.scored, 4);
        assert_eq!(summary.positive_total, 7);
        assert_eq!(summary.negative_total, -3);
        // averages after warm-up: mean(2,-3), mean(-3,3), mean(3,0)
        assert_eq!(summary.min_average, Some(-0.5));
        assert_eq!(summary.max_average, Some(1.5));
    }

    #[test]
    fn test_summary_without_full_window() {
        let summary = series("good great", 5).summary();
        assert_eq!(summary.min_average, None);
        assert_eq!(summary.max_average, None);
    }

    #[test]
    fn test_scored_words() {
        let s = series("a good day turned awful", 2);
        let words = s.scored_words();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].index, 1);
        assert_eq!(words[0].token, "good");
        assert_eq!(words[0].score, 2);
        assert_eq!(words[1].index, 4);
        assert_eq!(words[1].score, -3);
        assert_eq!(words[1].average, 0.0);
    }
}
