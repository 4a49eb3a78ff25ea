// crates/cli/src/main.rs
//! `sentiment-trend <window> <path>`
//!
//! Scores every word of a text document against an AFINN-style lexicon,
//! charts the trailing moving average of the scores, and prints the
//! annotated tail of the document.
//!
//! Exit status: 0 on success, 1 when the run fails, 2 on usage errors.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_trend_core::chart::write_chart;
use sentiment_trend_core::config::Settings;
use sentiment_trend_core::report::{annotated_tail, scored_word_lines, write_annotated_text};
use sentiment_trend_core::{score_document, WarmupPolicy, Window};
use tracing_subscriber::EnvFilter;

/// Chart the sentiment of a text document over its length
#[derive(Debug, Parser)]
#[command(name = "sentiment-trend")]
#[command(version)]
struct Cli {
    /// Number of preceding words averaged at each position (e.g. 550)
    #[arg(allow_negative_numbers = true)]
    window: i64,

    /// Text document to evaluate, with or without a directory
    path: String,

    /// Lexicon file or http(s) URL (overrides settings and environment)
    #[arg(long, value_name = "PATH|URL")]
    lexicon: Option<String>,

    /// Settings file (TOML); defaults to $SENTIMENT_TREND_CONFIG
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Values for positions before the window fills: zero, nan or partial
    #[arg(long, value_name = "POLICY")]
    warmup: Option<WarmupPolicy>,

    /// Skip writing the chart
    #[arg(long)]
    no_chart: bool,

    /// Also write the annotated text of the whole document
    #[arg(long)]
    export_text: bool,

    /// List every word that carried a score
    #[arg(long)]
    show_scored: bool,

    /// Number of trailing words to print
    #[arg(long, value_name = "N")]
    tail: Option<usize>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Fold command-line overrides into the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(lexicon) = &self.lexicon {
            settings.lexicon = lexicon.clone();
        }
        if let Some(warmup) = self.warmup {
            settings.warmup = warmup;
        }
        if self.no_chart {
            settings.chart.enabled = false;
        }
        if self.export_text {
            settings.report.export_text = true;
        }
        if let Some(tail) = self.tail {
            settings.report.tail_words = tail;
        }
    }
}

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,sentiment_trend=info,sentiment_trend_core=info",
        2 => "info,sentiment_trend=debug,sentiment_trend_core=debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli, mut settings: Settings) -> Result<()> {
    cli.apply(&mut settings);

    let window = Window::new(cli.window)?;
    let source = settings.lexicon_source();
    let (document, series) = score_document(&cli.path, source.as_ref(), window, settings.warmup)?;

    let today = chrono::Local::now().date_naive();
    let mut out = std::io::stdout().lock();

    if settings.chart.enabled {
        let chart = write_chart(&series, &document, today, &settings.chart_options())?;
        writeln!(out, "Chart saved to {}", chart.display())?;
    }

    let annotate = settings.annotate_options();
    if settings.report.export_text {
        let text = write_annotated_text(&series, &document, today, &annotate)?;
        writeln!(out, "Annotated text saved to {}", text.display())?;
    }

    if cli.show_scored {
        for line in scored_word_lines(&series) {
            writeln!(out, "{line}")?;
        }
    }

    let tail = settings.report.tail_words;
    for line in annotated_tail(&series, tail, &annotate) {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "Printed the last {} words", tail.min(series.len()))?;

    let summary = series.summary();
    tracing::info!(
        document = %document.display(),
        tokens = summary.tokens,
        scored = summary.scored,
        positive = summary.positive_total,
        negative = summary.negative_total,
        min_average = ?summary.min_average,
        max_average = ?summary.max_average,
        "Run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = Settings::load(cli.config.as_deref())
        .context("Failed to load settings")
        .and_then(|settings| run(cli, settings));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
