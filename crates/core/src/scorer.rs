// crates/core/src/scorer.rs
//! Per-token sentiment scores.
//!
//! Scoring never fails: a token the lexicon does not know scores 0, since
//! most words in a text carry no sentiment at all.

use crate::lexicon::Lexicon;

/// Which lexicon scores survive after lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    #[default]
    All,
    /// Only scores above zero; everything else becomes 0.
    Positive,
    /// Only scores below zero; everything else becomes 0.
    Negative,
}

impl Polarity {
    fn keep(self, score: i32) -> i32 {
        match self {
            Self::All => score,
            Self::Positive if score > 0 => score,
            Self::Negative if score < 0 => score,
            _ => 0,
        }
    }
}

/// Score every token, keeping only scores of the requested polarity.
pub fn score_with<S: AsRef<str>>(tokens: &[S], lexicon: &Lexicon, polarity: Polarity) -> Vec<i32> {
    tokens
        .iter()
        .map(|token| polarity.keep(lexicon.get(token.as_ref()).unwrap_or(0)))
        .collect()
}

/// Lexicon score of each token, 0 for unknown tokens.
pub fn score_tokens<S: AsRef<str>>(tokens: &[S], lexicon: &Lexicon) -> Vec<i32> {
    score_with(tokens, lexicon, Polarity::All)
}

pub fn score_positive<S: AsRef<str>>(tokens: &[S], lexicon: &Lexicon) -> Vec<i32> {
    score_with(tokens, lexicon, Polarity::Positive)
}

pub fn score_negative<S: AsRef<str>>(tokens: &[S], lexicon: &Lexicon) -> Vec<i32> {
    score_with(tokens, lexicon, Polarity::Negative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn lexicon() -> Lexicon {
        [("great", 3), ("awful", -3), ("meh", 0), ("good", 2)].into_iter().collect()
    }

    #[test]
    fn test_score_known_and_unknown_tokens() {
        let tokens = ["I", "feel", "great", "Really", "great"];
        let lexicon: Lexicon = [("great", 3)].into_iter().collect();
        assert_eq!(score_tokens(&tokens, &lexicon), vec![0, 0, 3, 0, 3]);
    }

    #[test]
    fn test_empty_token_scores_zero() {
        let tokens = ["", "great", ""];
        assert_eq!(score_tokens(&tokens, &lexicon()), vec![0, 3, 0]);
    }

    #[test]
    fn test_positive_only() {
        let tokens = ["great", "awful", "meh", "good", "unknown"];
        assert_eq!(score_positive(&tokens, &lexicon()), vec![3, 0, 0, 2, 0]);
    }

    #[test]
    fn test_negative_only() {
        let tokens = ["great", "awful", "meh", "good", "unknown"];
        assert_eq!(score_negative(&tokens, &lexicon()), vec![0, -3, 0, 0, 0]);
    }

    #[test]
    fn test_empty_input() {
        let tokens: [&str; 0] = [];
        assert!(score_tokens(&tokens, &lexicon()).is_empty());
    }

    fn token_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                Just("great".to_string()),
                Just("awful".to_string()),
                Just("meh".to_string()),
                Just("good".to_string()),
                "[a-z]{0,6}",
            ],
            0..64,
        )
    }

    proptest! {
        #[test]
        fn prop_positive_plus_negative_is_full(tokens in token_strategy()) {
            let lexicon = lexicon();
            let full = score_tokens(&tokens, &lexicon);
            let pos = score_positive(&tokens, &lexicon);
            let neg = score_negative(&tokens, &lexicon);
            let sum: Vec<i32> = pos.iter().zip(&neg).map(|(p, n)| p + n).collect();
            prop_assert_eq!(full, sum);
        }

        #[test]
        fn prop_scores_match_lexicon_or_zero(tokens in token_strategy()) {
            let lexicon = lexicon();
            let scores = score_tokens(&tokens, &lexicon);
            prop_assert_eq!(scores.len(), tokens.len());
            for (token, score) in tokens.iter().zip(&scores) {
                prop_assert_eq!(*score, lexicon.get(token).unwrap_or(0));
            }
        }
    }
}
