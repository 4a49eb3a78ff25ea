// crates/core/src/chart.rs
//! SVG line chart of a moving-average series.
//!
//! The chart is always SVG and is saved as `"<document> <YYYY-MM-DD>.svg"`.
//! A second run on the same day replaces the first chart.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::OutputError;
use crate::moving_average::Window;
use crate::pipeline::SentimentSeries;
use crate::report::dated_output_path;

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 40.0;
const Y_TICKS: usize = 5;

/// Chart geometry and tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Words between labelled x-axis ticks.
    pub tick_interval: usize,
    /// Words between full-height vertical marker lines.
    pub marker_interval: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            tick_interval: 500,
            marker_interval: 1000,
        }
    }
}

pub fn chart_title(document: &str, window: Window) -> String {
    format!("File: {document} - Moving Average Period: {window}")
}

/// Maps series coordinates onto the SVG canvas.
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    points: usize,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(opts: &ChartOptions, values: &[f64]) -> Self {
        let (mut y_min, mut y_max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if y_max - y_min < f64::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }

        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (f64::from(opts.width) - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (f64::from(opts.height) - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            points: values.len(),
            y_min,
            y_max,
        }
    }

    fn x(&self, index: usize) -> f64 {
        let span = self.points.saturating_sub(1).max(1) as f64;
        self.left + index as f64 * self.width / span
    }

    fn y(&self, value: f64) -> f64 {
        self.top + (self.y_max - value) / (self.y_max - self.y_min) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path data for the series; non-finite values split the line.
fn line_path(frame: &Frame, values: &[f64]) -> String {
    let mut d = String::new();
    let mut pen_down = false;
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            pen_down = false;
            continue;
        }
        let cmd = if pen_down { 'L' } else { 'M' };
        d.push_str(&format!("{cmd}{:.2},{:.2} ", frame.x(i), frame.y(*v)));
        pen_down = true;
    }
    d.trim_end().to_string()
}

/// Render the moving average of `series` as a standalone SVG document.
pub fn render_svg(series: &SentimentSeries, title: &str, opts: &ChartOptions) -> String {
    let values = series.averages();
    let frame = Frame::new(opts, values);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"10\">\n",
        w = opts.width,
        h = opts.height
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"20\" text-anchor=\"middle\" font-size=\"12\">{}</text>\n",
        f64::from(opts.width) / 2.0,
        escape_xml(title)
    ));
    svg.push_str(&format!(
        "<text transform=\"translate(14 {:.2}) rotate(-90)\" text-anchor=\"middle\">Sentiment Score</text>\n",
        frame.top + frame.height / 2.0
    ));

    // Vertical markers
    for i in (0..values.len()).step_by(opts.marker_interval.max(1)) {
        svg.push_str(&format!(
            "<line class=\"marker\" x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"#4c72b0\" stroke-opacity=\"0.35\"/>\n",
            frame.top,
            frame.bottom(),
            x = frame.x(i)
        ));
    }

    // Axes
    svg.push_str(&format!(
        "<path d=\"M{l:.2},{t:.2} L{l:.2},{b:.2} L{r:.2},{b:.2}\" fill=\"none\" stroke=\"black\"/>\n",
        l = frame.left,
        t = frame.top,
        b = frame.bottom(),
        r = frame.right()
    ));

    for i in (0..values.len()).step_by(opts.tick_interval.max(1)) {
        let x = frame.x(i);
        svg.push_str(&format!(
            "<line class=\"x-tick\" x1=\"{x:.2}\" y1=\"{b:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"black\"/>\n<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\">{i}</text>\n",
            frame.bottom() + 4.0,
            frame.bottom() + 16.0,
            b = frame.bottom()
        ));
    }

    for k in 0..=Y_TICKS {
        let value = frame.y_min + (frame.y_max - frame.y_min) * k as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        svg.push_str(&format!(
            "<line class=\"y-tick\" x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{l:.2}\" y2=\"{y:.2}\" stroke=\"black\"/>\n<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\">{value:.2}</text>\n",
            frame.left - 4.0,
            frame.left - 6.0,
            y + 3.0,
            l = frame.left
        ));
    }

    let d = line_path(&frame, values);
    if !d.is_empty() {
        svg.push_str(&format!(
            "<path class=\"series\" d=\"{d}\" fill=\"none\" stroke=\"#1f77b4\" stroke-width=\"1\"/>\n"
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render the chart for `document` and save it next to the document.
pub fn write_chart(
    series: &SentimentSeries,
    document: &Path,
    date: NaiveDate,
    opts: &ChartOptions,
) -> Result<PathBuf, OutputError> {
    let path = dated_output_path(document, date, "svg");
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.display().to_string());
    let svg = render_svg(series, &chart_title(&name, series.window()), opts);

    std::fs::write(&path, svg).map_err(|source| OutputError {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), points = series.len(), "Chart written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::moving_average::WarmupPolicy;
    use crate::pipeline::analyze;
    use crate::tokenizer::tokenize_text;
    use tempfile::TempDir;

    fn series(text: &str, window: i64, warmup: WarmupPolicy) -> SentimentSeries {
        let lexicon: Lexicon = [("great", 3), ("awful", -3)].into_iter().collect();
        analyze(tokenize_text(text), &lexicon, Window::new(window).unwrap(), warmup)
    }

    fn long_text(words: usize) -> String {
        (0..words)
            .map(|i| if i % 7 == 0 { "great" } else if i % 11 == 0 { "awful" } else { "word" })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_chart_title() {
        let title = chart_title("novel.txt", Window::new(550).unwrap());
        assert_eq!(title, "File: novel.txt - Moving Average Period: 550");
    }

    #[test]
    fn test_render_contains_labels() {
        let s = series(&long_text(50), 5, WarmupPolicy::Zero);
        let svg = render_svg(&s, "File: a<b>.txt - Moving Average Period: 5", &ChartOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Sentiment Score"));
        assert!(svg.contains("File: a&lt;b&gt;.txt"));
        assert!(svg.contains("class=\"series\""));
    }

    #[test]
    fn test_tick_and_marker_spacing() {
        let s = series(&long_text(2300), 100, WarmupPolicy::Zero);
        let svg = render_svg(&s, "t", &ChartOptions::default());
        // ticks at 0, 500, 1000, 1500, 2000
        assert_eq!(svg.matches("class=\"x-tick\"").count(), 5);
        // markers at 0, 1000, 2000
        assert_eq!(svg.matches("class=\"marker\"").count(), 3);
    }

    #[test]
    fn test_nan_warmup_breaks_the_line() {
        let s = series(&long_text(40), 10, WarmupPolicy::Nan);
        let frame = Frame::new(&ChartOptions::default(), s.averages());
        let d = line_path(&frame, s.averages());
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('M').count(), 1);
        assert_eq!(d.matches('L').count(), 29);
    }

    #[test]
    fn test_render_empty_series() {
        let s = series("", 3, WarmupPolicy::Zero);
        let svg = render_svg(&s, "empty", &ChartOptions::default());
        assert!(!svg.contains("class=\"series\""));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_write_chart_uses_dated_name() {
        let dir = TempDir::new().unwrap();
        let document = dir.path().join("novel.txt");
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let s = series(&long_text(30), 5, WarmupPolicy::Zero);

        let path = write_chart(&s, &document, date, &ChartOptions::default()).unwrap();
        assert_eq!(path, dir.path().join("novel.txt 2024-03-09.svg"));
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("File: novel.txt - Moving Average Period: 5"));
    }
}
