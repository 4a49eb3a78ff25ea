// crates/core/src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a lexicon
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Lexicon file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading lexicon: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch lexicon from {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Lexicon request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Lexicon request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Malformed lexicon entry at line {line} of {origin}: {reason} (got {content:?})")]
    Parse {
        origin: String,
        line: usize,
        content: String,
        reason: String,
    },
}

impl LexiconError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn http(url: impl Into<String>, source: reqwest::Error, timeout: Duration) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url, timeout }
        } else {
            Self::Http { url, source }
        }
    }

    /// True for malformed lexicon content.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// True when the lexicon source itself could not be read.
    pub fn is_source_error(&self) -> bool {
        !self.is_parse_error()
    }
}

/// Errors that can occur when locating or reading the document to score
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input document not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading input document: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A moving-average window that is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid moving-average window {window}: the window must be a positive number of words")]
pub struct InvalidWindowError {
    pub window: i64,
}

/// Errors that can occur when reading a settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that can occur while writing the chart or the annotated text
#[derive(Debug, Error)]
#[error("Failed to write {path}: {source}")]
pub struct OutputError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Any failure of a scoring run.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Window(#[from] InvalidWindowError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
