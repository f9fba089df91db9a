//! Lexicon-vote sentiment scoring.

use crate::lexicon::{Lexicon, Phrase};
use crate::model::analysis::Sentiment;

/// Scores `normalized` text by counting positive and negative phrase hits.
///
/// The larger side wins; equal counts (including zero) are neutral.
pub fn score_sentiment(lexicon: &Lexicon, normalized: &str) -> Sentiment {
    let positive = count_hits(lexicon.positive_phrases(), normalized);
    let negative = count_hits(lexicon.negative_phrases(), normalized);

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

fn count_hits(phrases: &[Phrase], normalized: &str) -> usize {
    phrases
        .iter()
        .filter(|phrase| phrase.is_match(normalized))
        .count()
}

#[cfg(test)]
mod tests {
    use super::score_sentiment;
    use crate::lexicon::Lexicon;
    use crate::model::analysis::Sentiment;

    fn lexicon() -> Lexicon {
        Lexicon::from_toml_str(
            r#"
fallback_category = "misc"

[sentiment]
positive = ["great", "happy"]
negative = ["tired", "no energy"]

[[categories]]
name = "misc"
"#,
        )
        .expect("test lexicon parses")
    }

    #[test]
    fn majority_decides() {
        let lexicon = lexicon();
        assert_eq!(score_sentiment(&lexicon, "great and happy but tired"), Sentiment::Positive);
        assert_eq!(score_sentiment(&lexicon, "tired with no energy"), Sentiment::Negative);
    }

    #[test]
    fn ties_and_silence_are_neutral() {
        let lexicon = lexicon();
        assert_eq!(score_sentiment(&lexicon, "happy yet tired"), Sentiment::Neutral);
        assert_eq!(score_sentiment(&lexicon, "plain words"), Sentiment::Neutral);
    }
}
