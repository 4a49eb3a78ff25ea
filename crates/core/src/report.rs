// crates/core/src/report.rs
//! Plain-text renderings of a scored document.
//!
//! The annotated-text format shows a sampled position, its moving average
//! (scaled, by default ×100 for readability) and the words leading up to it:
//!
//! ```text
//! 550	  12.364: 	the twenty words before position 550 ...
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::OutputError;
use crate::pipeline::SentimentSeries;

/// Layout of annotated-text lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotateOptions {
    /// Distance between sampled positions.
    pub step: usize,
    /// Number of preceding words shown as context.
    pub context_words: usize,
    /// Factor applied to the moving average before printing.
    pub scale: f64,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            step: 10,
            context_words: 20,
            scale: 100.0,
        }
    }
}

/// Annotated line for position `index`.
///
/// The context is the up-to-`context_words` tokens before `index`, so the
/// average printed is the one in effect at the end of that context.
fn annotated_line(series: &SentimentSeries, index: usize, opts: &AnnotateOptions) -> String {
    let score = format_score(series.averages()[index] * opts.scale);
    // Keeps the colons lined up for scores like 12.345 and 1.234.
    let filler = if score.len() == 6 { " " } else { "  " };
    let start = index.saturating_sub(opts.context_words);
    let context = series.tokens()[start..index].join(" ");
    format!("{index}\t{filler}{score}: \t{context}")
}

fn format_score(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.3}")
    }
}

/// Annotated lines for positions in `range`, every `opts.step` positions.
///
/// The range is clamped to the document.
pub fn annotated_lines(
    series: &SentimentSeries,
    range: Range<usize>,
    opts: &AnnotateOptions,
) -> Vec<String> {
    let end = range.end.min(series.len());
    let start = range.start.min(end);
    (start..end)
        .step_by(opts.step.max(1))
        .map(|i| annotated_line(series, i, opts))
        .collect()
}

/// Annotated lines for the last `words` positions of the document.
pub fn annotated_tail(series: &SentimentSeries, words: usize, opts: &AnnotateOptions) -> Vec<String> {
    let start = series.len().saturating_sub(words);
    annotated_lines(series, start..series.len(), opts)
}

/// Output file for `document` on `date`: `"<document> <YYYY-MM-DD>.<ext>"`.
///
/// Runs on the same day produce the same name, so a later run replaces the
/// earlier file.
pub fn dated_output_path(document: &Path, date: NaiveDate, extension: &str) -> PathBuf {
    PathBuf::from(format!(
        "{} {}.{}",
        document.display(),
        date.format("%Y-%m-%d"),
        extension
    ))
}

/// Write the annotated text of the whole document next to it.
///
/// Overwrites any existing file of the same name.
pub fn write_annotated_text(
    series: &SentimentSeries,
    document: &Path,
    date: NaiveDate,
    opts: &AnnotateOptions,
) -> Result<PathBuf, OutputError> {
    let path = dated_output_path(document, date, "txt");
    let mut contents = String::new();
    for line in annotated_lines(series, 0..series.len(), opts) {
        contents.push_str(&line);
        contents.push('\n');
    }

    std::fs::write(&path, contents).map_err(|source| OutputError {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Annotated text written");
    Ok(path)
}

/// One line per sentiment-bearing word: position, moving average, word, score.
pub fn scored_word_lines(series: &SentimentSeries) -> Vec<String> {
    series
        .scored_words()
        .into_iter()
        .map(|w| format!("{} ({:.4}): \t{} {}", w.index, w.average, w.token, w.score))
        .collect()
}

/// Score and word side by side for the positions in `range`.
pub fn word_score_columns(series: &SentimentSeries, range: Range<usize>) -> Vec<String> {
    let end = range.end.min(series.len());
    let start = range.start.min(end);
    series.scores()[start..end]
        .iter()
        .zip(&series.tokens()[start..end])
        .map(|(score, token)| format!("{score}\t\t{token}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::moving_average::{WarmupPolicy, Window};
    use crate::pipeline::analyze;
    use crate::tokenizer::tokenize_text;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn series(text: &str, window: i64, warmup: WarmupPolicy) -> SentimentSeries {
        let lexicon: Lexicon = [("great", 3), ("awful", -3), ("good", 2)].into_iter().collect();
        analyze(tokenize_text(text), &lexicon, Window::new(window).unwrap(), warmup)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_annotated_line_layout() {
        let s = series("I feel great! Really great.", 2, WarmupPolicy::Zero);
        let opts = AnnotateOptions::default();
        assert_eq!(annotated_line(&s, 3, &opts), "3\t  150.000: \tI feel great");
        assert_eq!(annotated_line(&s, 0, &opts), "0\t  0.000: \t");
    }

    #[test]
    fn test_annotated_line_six_char_score_uses_single_space() {
        let s = series("good awful great", 1, WarmupPolicy::Zero);
        let opts = AnnotateOptions {
            scale: 1.0,
            ..AnnotateOptions::default()
        };
        // -3.000 is six characters wide
        assert_eq!(annotated_line(&s, 2, &opts), "2\t -3.000: \tgood awful");
    }

    #[test]
    fn test_annotated_line_context_is_bounded() {
        let text = (0..30).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let s = series(&text, 5, WarmupPolicy::Zero);
        let opts = AnnotateOptions {
            context_words: 3,
            ..AnnotateOptions::default()
        };
        assert!(annotated_line(&s, 25, &opts).ends_with("\tw22 w23 w24"));
    }

    #[test]
    fn test_annotated_line_nan_warmup() {
        let s = series("good great", 2, WarmupPolicy::Nan);
        assert_eq!(annotated_line(&s, 1, &AnnotateOptions::default()), "1\t  nan: \tgood");
    }

    #[test]
    fn test_annotated_lines_step_and_clamp() {
        let text = (0..25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let s = series(&text, 5, WarmupPolicy::Zero);
        let lines = annotated_lines(&s, 0..1000, &AnnotateOptions::default());
        let indices: Vec<&str> = lines.iter().map(|l| l.split('\t').next().unwrap()).collect();
        assert_eq!(indices, vec!["0", "10", "20"]);
    }

    #[test]
    fn test_annotated_lines_range_past_end_is_empty() {
        let s = series("good great", 1, WarmupPolicy::Zero);
        assert!(annotated_lines(&s, 5..9, &AnnotateOptions::default()).is_empty());
        assert!(annotated_tail(&series("", 1, WarmupPolicy::Zero), 10, &AnnotateOptions::default()).is_empty());
    }

    #[test]
    fn test_annotated_tail() {
        let text = (0..25).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let s = series(&text, 5, WarmupPolicy::Zero);
        let lines = annotated_tail(&s, 12, &AnnotateOptions::default());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("13\t"));
        assert!(lines[1].starts_with("23\t"));
    }

    #[test]
    fn test_dated_output_path() {
        let path = dated_output_path(Path::new("texts/novel.txt"), date(), "svg");
        assert_eq!(path, PathBuf::from("texts/novel.txt 2024-03-09.svg"));
    }

    #[test]
    fn test_write_annotated_text_overwrites_same_day() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("review.txt");
        let opts = AnnotateOptions::default();

        let first = series("great ".repeat(30).as_str(), 2, WarmupPolicy::Zero);
        let path = write_annotated_text(&first, &document, date(), &opts).unwrap();
        let second = series("awful ".repeat(15).as_str(), 2, WarmupPolicy::Zero);
        let again = write_annotated_text(&second, &document, date(), &opts).unwrap();

        assert_eq!(path, again);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("-300.000"));
    }

    #[test]
    fn test_write_annotated_text_reports_failure() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("missing-dir").join("review.txt");
        let s = series("good", 1, WarmupPolicy::Zero);
        let err = write_annotated_text(&s, &document, date(), &AnnotateOptions::default()).unwrap_err();
        assert!(err.to_string().contains("review.txt 2024-03-09.txt"));
    }

    #[test]
    fn test_scored_word_lines() {
        let s = series("a good day turned awful", 2, WarmupPolicy::Zero);
        assert_eq!(
            scored_word_lines(&s),
            vec!["1 (0.0000): \tgood 2", "4 (0.0000): \tawful -3"]
        );
    }

    #[test]
    fn test_word_score_columns() {
        let s = series("a good day", 1, WarmupPolicy::Zero);
        assert_eq!(word_score_columns(&s, 0..10), vec!["0\t\ta", "2\t\tgood", "0\t\tday"]);
        assert_eq!(word_score_columns(&s, 1..2), vec!["2\t\tgood"]);
    }
}
