// crates/core/src/tokenizer.rs
//! Turns a plain-text document into its ordered word tokens.
//!
//! Every whitespace-delimited unit becomes exactly one token, with anything
//! that is not an ASCII word character removed. A unit made only of
//! punctuation (a lone `--`, say) becomes an empty token rather than
//! disappearing, so token positions always match word positions in the
//! source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{is_separator, PathBuf, MAIN_SEPARATOR_STR};
use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::error::InputError;

static PUNCTUATION: OnceLock<Regex> = OnceLock::new();

fn punctuation() -> &'static Regex {
    PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]").expect("punctuation pattern is valid"))
}

/// Remove every character that is neither a word character nor whitespace.
pub fn strip_punctuation(unit: &str) -> String {
    punctuation().replace_all(unit, "").into_owned()
}

/// Tokenize in-memory text, line by line, in reading order.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.lines().flat_map(tokenize_line).collect()
}

fn tokenize_line(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split_whitespace().map(strip_punctuation)
}

/// Resolve a user-supplied document path and check that the file exists.
///
/// - A bare file name resolves against the current working directory.
/// - Anything with a separator splits at the last separator into directory
///   and file name.
/// - A trailing separator is a user mistake we recover from: it is logged,
///   and the path is split at the second-to-last separator instead.
pub fn resolve_document_path(raw: &str) -> Result<PathBuf, InputError> {
    let separators: Vec<usize> = raw
        .char_indices()
        .filter(|(_, c)| is_separator(*c))
        .map(|(i, _)| i)
        .collect();

    let (dir, name) = match separators.as_slice() {
        [] => (current_dir()?, raw),
        [.., last] if *last + 1 == raw.len() => {
            warn!(path = raw, "The document path ends with a separator; drop the trailing separator");
            match separators.len() {
                1 => (current_dir()?, &raw[..*last]),
                n => {
                    let prev = separators[n - 2];
                    (dir_from(&raw[..prev]), &raw[prev + 1..*last])
                }
            }
        }
        [.., last] => (dir_from(&raw[..*last]), &raw[*last + 1..]),
    };

    debug!(dir = %dir.display(), file = name, "Resolved document path");

    let path = dir.join(name);
    if name.is_empty() || !path.exists() {
        return Err(InputError::not_found(path));
    }
    Ok(path)
}

fn current_dir() -> Result<PathBuf, InputError> {
    std::env::current_dir().map_err(|e| InputError::io(".", e))
}

/// Directory part of a split path; an empty prefix means the root.
fn dir_from(prefix: &str) -> PathBuf {
    if prefix.is_empty() {
        PathBuf::from(MAIN_SEPARATOR_STR)
    } else {
        PathBuf::from(prefix)
    }
}

/// Resolve, read and tokenize a document.
///
/// Returns the resolved path alongside the tokens so callers can name
/// output files after the document that was actually read.
pub fn tokenize_file(raw: &str) -> Result<(PathBuf, Vec<String>), InputError> {
    let path = resolve_document_path(raw)?;
    let file = File::open(&path).map_err(|e| InputError::io(&path, e))?;

    // Bytes that are not UTF-8 decode to U+FFFD, which the punctuation
    // strip then removes.
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut tokens = Vec::new();
    let mut line_count = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| InputError::io(&path, e))?;
        if read == 0 {
            break;
        }
        tokens.extend(tokenize_line(&String::from_utf8_lossy(&buf)));
        line_count += 1;
    }

    info!(path = %path.display(), lines = line_count, tokens = tokens.len(), "Document tokenized");
    Ok((path, tokens))
}

/// Every index at which `word` occurs in `tokens`.
pub fn locate_word(word: &str, tokens: &[String]) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.as_str() == word)
        .map(|(i, _)| i)
        .collect()
}
