//! Surface keyword extraction.

use crate::lexicon::Lexicon;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Default number of keywords kept per analysis.
pub const DEFAULT_KEYWORD_CAP: usize = 5;

/// Tokens of this many characters or fewer are dropped.
const MIN_TOKEN_CHARS_EXCLUSIVE: usize = 2;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Extracts up to `cap` keywords from normalized text.
///
/// Stop words and tokens of length <= 2 characters are dropped; duplicates
/// keep their first occurrence.
pub fn extract_keywords(lexicon: &Lexicon, normalized: &str, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    WORD_RE
        .find_iter(normalized)
        .map(|token| token.as_str())
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS_EXCLUSIVE)
        .filter(|token| !lexicon.is_stop_word(token))
        .filter(|token| seen.insert(*token))
        .take(cap)
        .map(str::to_string)
        .collect()
}
