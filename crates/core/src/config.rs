// crates/core/src/config.rs
//! Run settings, read from an optional TOML file.
//!
//! ```toml
//! lexicon = "data/AFINN-111.txt"   # or an http(s) URL
//! timeout_secs = 10
//! retries = 1
//! warmup = "zero"                  # zero | nan | partial
//!
//! [chart]
//! enabled = true
//! tick_interval = 500
//! marker_interval = 1000
//!
//! [report]
//! sample_step = 10
//! context_words = 20
//! tail_words = 250
//! ```
//!
//! Every key is optional. `SENTIMENT_TREND_CONFIG` points at the file when no
//! path is given explicitly; `SENTIMENT_TREND_LEXICON` overrides `lexicon`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::chart::ChartOptions;
use crate::error::ConfigError;
use crate::lexicon::{lexicon_source_from, LexiconSource, AFINN_111_URL};
use crate::moving_average::WarmupPolicy;
use crate::report::AnnotateOptions;

pub const CONFIG_ENV: &str = "SENTIMENT_TREND_CONFIG";
pub const LEXICON_ENV: &str = "SENTIMENT_TREND_LEXICON";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Local path or http(s) URL of the lexicon.
    pub lexicon: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub warmup: WarmupPolicy,
    pub chart: ChartSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub tick_interval: usize,
    pub marker_interval: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Also write the annotated text of the whole document to disk.
    pub export_text: bool,
    pub sample_step: usize,
    pub context_words: usize,
    /// Number of trailing words printed to the console after a run.
    pub tail_words: usize,
    pub scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lexicon: AFINN_111_URL.into(),
            timeout_secs: 10,
            retries: 1,
            warmup: WarmupPolicy::Zero,
            chart: ChartSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        let opts = ChartOptions::default();
        Self {
            enabled: true,
            width: opts.width,
            height: opts.height,
            tick_interval: opts.tick_interval,
            marker_interval: opts.marker_interval,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        let opts = AnnotateOptions::default();
        Self {
            export_text: false,
            sample_step: opts.step,
            context_words: opts.context_words,
            tail_words: 250,
            scale: opts.scale,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_toml_str(&text, path)
    }

    /// Settings from `explicit`, else `$SENTIMENT_TREND_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(explicit, |key| std::env::var(key).ok())
    }

    /// [`Settings::load`] with the environment supplied by the caller.
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

        let mut settings = match path {
            Some(path) => {
                debug!(path = %path.display(), "Reading settings");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Some(lexicon) = env(LEXICON_ENV).filter(|v| !v.is_empty()) {
            settings.lexicon = lexicon;
        }
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn lexicon_source(&self) -> Box<dyn LexiconSource> {
        lexicon_source_from(&self.lexicon, self.timeout(), self.retries)
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.chart.width,
            height: self.chart.height,
            tick_interval: self.chart.tick_interval,
            marker_interval: self.chart.marker_interval,
        }
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            step: self.report.sample_step,
            context_words: self.report.context_words,
            scale: self.report.scale,
        }
    }
}
