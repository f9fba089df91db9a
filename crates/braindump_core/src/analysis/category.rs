//! Category classification by trigger counting.

use crate::lexicon::Lexicon;
use crate::model::analysis::Analysis;
use log::debug;

/// Number of trigger hits at which confidence saturates.
const FULL_CONFIDENCE_HITS: f64 = 3.0;

/// Picks the best category for `normalized` text.
///
/// Categories are scanned in declared order and a later category only
/// replaces the current best with a strictly higher hit count, so ties go to
/// the category declared first. Returns the fallback category with
/// [`Analysis::FALLBACK_CONFIDENCE`] when no trigger matches.
pub fn classify_category<'a>(lexicon: &'a Lexicon, normalized: &str) -> (&'a str, f64) {
    let mut best: Option<(&str, usize)> = None;

    for entry in lexicon.categories() {
        let hits = entry
            .triggers()
            .iter()
            .filter(|trigger| trigger.is_match(normalized))
            .count();
        if hits == 0 {
            continue;
        }
        if best.map_or(true, |(_, best_hits)| hits > best_hits) {
            best = Some((entry.name(), hits));
        }
    }

    match best {
        Some((name, hits)) => {
            let confidence = (hits as f64 / FULL_CONFIDENCE_HITS).min(1.0);
            debug!(
                "event=classify_category module=analysis status=ok hits={} confidence={:.2}",
                hits, confidence
            );
            (name, confidence)
        }
        None => (lexicon.fallback_category(), Analysis::FALLBACK_CONFIDENCE),
    }
}

#[cfg(test)]
mod tests {
    use super::classify_category;
    use crate::lexicon::Lexicon;

    const LEXICON: &str = r#"
fallback_category = "misc"

[[categories]]
name = "chores"
triggers = ["laundry", "dishes"]

[[categories]]
name = "work"
triggers = ["office", "deadline", "boss", "meeting"]

[[categories]]
name = "misc"
"#;

    fn lexicon() -> Lexicon {
        Lexicon::from_toml_str(LEXICON).expect("test lexicon parses")
    }

    #[test]
    fn strict_maximum_wins() {
        let lexicon = lexicon();
        let (name, confidence) = classify_category(&lexicon, "laundry before the office deadline");
        assert_eq!(name, "work");
        assert!((confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tie_goes_to_first_declared_category() {
        let lexicon = lexicon();
        for _ in 0..10 {
            let (name, _) = classify_category(&lexicon, "office then laundry");
            assert_eq!(name, "chores");
        }
    }

    #[test]
    fn confidence_saturates_at_one() {
        let lexicon = lexicon();
        let (_, confidence) = classify_category(&lexicon, "office deadline boss meeting");
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn no_trigger_falls_back() {
        let lexicon = lexicon();
        assert_eq!(classify_category(&lexicon, "sunny afternoon"), ("misc", 0.3));
    }
}
