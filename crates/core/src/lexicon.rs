// crates/core/src/lexicon.rs
//! Word → sentiment-score lexicons (AFINN-style `word<TAB>score` files).
//!
//! A [`Lexicon`] is built once per run from a [`LexiconSource`] and then only
//! read. Downstream stages never learn whether it came from disk or from the
//! network.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::LexiconError;

/// Public copy of AFINN-111 used when no lexicon is configured.
pub const AFINN_111_URL: &str =
    "https://raw.githubusercontent.com/uwescience/datasci_course_materials/master/assignment1/AFINN-111.txt";

/// Default timeout for a remote lexicon request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Initial delay before retrying a failed remote request. Doubles per attempt.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Immutable mapping from a (case-sensitive) word to its integer score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    scores: HashMap<String, i32>,
}

impl Lexicon {
    /// Parse lexicon text, one `word<TAB>score` entry per line.
    ///
    /// `origin` names the source (path or URL) in error messages. A later
    /// entry for the same word replaces an earlier one.
    pub fn parse_str(text: &str, origin: &str) -> Result<Self, LexiconError> {
        let mut scores = HashMap::new();
        let mut duplicates = 0usize;

        for (idx, line) in text.lines().enumerate() {
            let (word, score) = parse_line(line).map_err(|reason| LexiconError::Parse {
                origin: origin.to_string(),
                line: idx + 1,
                content: line.to_string(),
                reason,
            })?;
            if scores.insert(word.to_string(), score).is_some() {
                duplicates += 1;
                debug!(origin, word, line = idx + 1, "Duplicate lexicon entry overrides earlier score");
            }
        }

        info!(origin, entries = scores.len(), duplicates, "Lexicon loaded");
        Ok(Self { scores })
    }

    /// Score stored for `word`, if any.
    pub fn get(&self, word: &str) -> Option<i32> {
        self.scores.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.scores.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.scores.iter().map(|(word, score)| (word.as_str(), *score))
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().map(|(word, score)| (word.into(), score)).collect(),
        }
    }
}

/// Split one line into its word and score.
///
/// The line must contain exactly one tab. Whitespace around the score is
/// tolerated (a stray `\r` from a CRLF file, for instance); the word is kept
/// verbatim, so multi-word AFINN entries like `does not work` survive.
fn parse_line(line: &str) -> Result<(&str, i32), String> {
    let mut fields = line.split('\t');
    let (Some(word), Some(score), None) = (fields.next(), fields.next(), fields.next()) else {
        let count = line.split('\t').count();
        return Err(format!("expected `word<TAB>score`, found {count} field(s)"));
    };
    let score = score
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("score is not an integer ({e})"))?;
    Ok((word, score))
}

/// Somewhere a lexicon can be loaded from.
pub trait LexiconSource {
    /// Human-readable location (path or URL) for logs and messages.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Lexicon, LexiconError>;
}

/// Lexicon file on the local file system.
#[derive(Debug, Clone)]
pub struct LocalLexicon {
    path: PathBuf,
}

impl LocalLexicon {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LexiconSource for LocalLexicon {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Lexicon, LexiconError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| LexiconError::io(&self.path, e))?;
        Lexicon::parse_str(&text, &self.describe())
    }
}

/// Lexicon served as plain text over HTTP(S).
#[derive(Debug, Clone)]
pub struct RemoteLexicon {
    url: String,
    timeout: Duration,
    retries: u32,
    backoff: Duration,
}

impl RemoteLexicon {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: 1,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of extra attempts after a transport failure or a 5xx response.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn fetch_once(&self, client: &reqwest::blocking::Client) -> Result<String, LexiconError> {
        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| LexiconError::http(&self.url, e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LexiconError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .map_err(|e| LexiconError::http(&self.url, e, self.timeout))
    }
}

/// Client errors (4xx) will not change on retry; everything else might.
fn is_retryable(err: &LexiconError) -> bool {
    match err {
        LexiconError::Status { status, .. } => *status >= 500,
        LexiconError::Http { .. } | LexiconError::Timeout { .. } => true,
        _ => false,
    }
}

impl LexiconSource for RemoteLexicon {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Lexicon, LexiconError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LexiconError::http(&self.url, e, self.timeout))?;

        let mut attempt = 0u32;
        let body = loop {
            match self.fetch_once(&client) {
                Ok(body) => break body,
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    let delay = self.backoff * 2u32.saturating_pow(attempt);
                    warn!(url = %self.url, attempt = attempt + 1, error = %e, delay_ms = delay.as_millis() as u64, "Lexicon fetch failed, retrying");
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        Lexicon::parse_str(&body, &self.url)
    }
}

/// Pick a source for a configured lexicon location.
///
/// `http://` and `https://` locations (scheme in any case) are fetched;
/// anything else is treated as a local path.
pub fn lexicon_source_from(
    location: &str,
    timeout: Duration,
    retries: u32,
) -> Box<dyn LexiconSource> {
    if has_scheme(location, "http://") || has_scheme(location, "https://") {
        Box::new(RemoteLexicon::new(location).with_timeout(timeout).with_retries(retries))
    } else {
        Box::new(LocalLexicon::new(location))
    }
}

fn has_scheme(location: &str, scheme: &str) -> bool {
    location
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}
