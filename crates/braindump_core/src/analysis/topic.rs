//! Multi-label topic detection.

use crate::lexicon::Lexicon;

/// Returns every topic with at least one keyword hit, in canonical order.
///
/// Keyword checks for a topic stop at the first hit; detection is presence,
/// not frequency.
pub fn detect_topics(lexicon: &Lexicon, normalized: &str) -> Vec<String> {
    lexicon
        .topics()
        .iter()
        .filter(|topic| {
            topic
                .keywords()
                .iter()
                .any(|keyword| keyword.is_match(normalized))
        })
        .map(|topic| topic.name().to_string())
        .collect()
}
