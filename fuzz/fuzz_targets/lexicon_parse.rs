#![no_main]

use libfuzzer_sys::fuzz_target;
use sentiment_trend_core::tokenizer::tokenize_text;
use sentiment_trend_core::Lexicon;

// Arbitrary bytes must never panic the lexicon parser or the tokenizer:
// they either parse or return an error.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(lexicon) = Lexicon::parse_str(text, "fuzz") {
        assert!(lexicon.len() <= text.lines().count());
    }
    let tokens = tokenize_text(text);
    assert_eq!(tokens.len(), text.split_whitespace().count());
});
