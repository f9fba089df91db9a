//! Precompiled whole-word phrase matcher.

use crate::analysis::normalize::normalize;
use crate::lexicon::LexiconError;
use regex::Regex;

/// One lexicon phrase compiled into a boundary-anchored matcher.
///
/// A phrase matches only when it is bounded by non-word characters or string
/// edges on both sides. An optional proclitic prefix (for example the Hebrew
/// conjunction `ו`) may be attached to the first word without breaking the
/// match; any other attached letter does.
#[derive(Debug, Clone)]
pub struct Phrase {
    text: String,
    pattern: Regex,
}

impl Phrase {
    /// Normalizes `raw` and compiles its matcher.
    ///
    /// # Errors
    /// - `EmptyPhrase` when `raw` normalizes to an empty string.
    /// - `InvalidPattern` when the generated regex is rejected.
    pub fn compile(owner: &str, raw: &str, proclitics: &[String]) -> Result<Self, LexiconError> {
        let text = normalize(raw);
        if text.is_empty() {
            return Err(LexiconError::EmptyPhrase {
                owner: owner.to_string(),
            });
        }

        let escaped = regex::escape(&text);
        let source = if proclitics.is_empty() {
            format!(r"\b{escaped}\b")
        } else {
            let prefixes = proclitics
                .iter()
                .map(|prefix| regex::escape(prefix))
                .collect::<Vec<_>>()
                .join("|");
            format!(r"\b(?:{prefixes})?{escaped}\b")
        };

        let pattern = Regex::new(&source).map_err(|source| LexiconError::InvalidPattern {
            phrase: text.clone(),
            source,
        })?;

        Ok(Self { text, pattern })
    }

    /// Normalized phrase text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Tests the phrase against already-normalized text.
    pub fn is_match(&self, normalized: &str) -> bool {
        self.pattern.is_match(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::Phrase;

    #[test]
    fn matches_whole_words_only() {
        let phrase = Phrase::compile("test", "work", &[]).expect("phrase compiles");
        assert!(phrase.is_match("late work again"));
        assert!(phrase.is_match("work"));
        assert!(phrase.is_match("(work)"));
        assert!(!phrase.is_match("homework"));
        assert!(!phrase.is_match("workshop"));
    }

    #[test]
    fn multi_word_phrase_is_normalized_before_compiling() {
        let phrase = Phrase::compile("test", "  No   Energy ", &[]).expect("phrase compiles");
        assert_eq!(phrase.as_str(), "no energy");
        assert!(phrase.is_match("i have no energy today"));
        assert!(!phrase.is_match("no energyzer"));
    }

    #[test]
    fn proclitic_prefix_keeps_match_but_other_letters_do_not() {
        let proclitics = vec!["ו".to_string()];
        let phrase = Phrase::compile("test", "לחץ", &proclitics).expect("phrase compiles");
        assert!(phrase.is_match("עבודה ולחץ"));
        assert!(phrase.is_match("יש לחץ"));
        assert!(!phrase.is_match("בלחץ"));
    }

    #[test]
    fn blank_phrase_is_rejected() {
        assert!(Phrase::compile("owner", "   ", &[]).is_err());
    }
}
