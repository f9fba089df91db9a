//! Text normalization shared by lexicon compilation and analysis.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Collapses whitespace runs to one space, trims and case-folds `text`.
pub fn normalize(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn collapses_whitespace_and_lowercases() {
        assert_eq!(normalize("  Hello\t\tWORLD \n again "), "hello world again");
    }

    #[test]
    fn blank_input_normalizes_to_empty() {
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn hebrew_text_is_left_intact() {
        assert_eq!(normalize("עבודה   ולחץ"), "עבודה ולחץ");
    }
}
