// crates/core/src/lib.rs
pub mod chart;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod moving_average;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod tokenizer;

pub use error::*;
pub use lexicon::{Lexicon, LexiconSource, LocalLexicon, RemoteLexicon};
pub use moving_average::{moving_average, moving_average_with, WarmupPolicy, Window};
pub use pipeline::{analyze, score_document, SentimentSeries};
pub use scorer::{score_negative, score_positive, score_tokens, Polarity};
pub use tokenizer::{tokenize_file, tokenize_text};
