use braindump_core::{Analysis, Analyzer, Lexicon, Sentiment};
use std::sync::Arc;

const TIE_LEXICON: &str = r#"
fallback_category = "misc"
stop_words = ["the", "and"]

[sentiment]
positive = ["great"]
negative = ["awful"]

[[categories]]
name = "errands"
triggers = ["buy", "call"]

[[categories]]
name = "work"
triggers = ["meeting", "deadline"]

[[categories]]
name = "misc"

[[topics]]
name = "health"
keywords = ["doctor", "gym"]

[[topics]]
name = "money"
keywords = ["rent", "salary"]

[[topics]]
name = "family"
keywords = ["mom", "dad"]
"#;

fn tie_analyzer() -> Analyzer {
    Analyzer::new(Arc::new(Lexicon::from_toml_str(TIE_LEXICON).unwrap()))
}

#[test]
fn work_and_stress_text_is_work_with_negative_sentiment() {
    let analysis = Analyzer::builtin().analyze("אני כותב על עבודה ולחץ");

    assert_eq!(analysis.category, "עבודה");
    assert!(analysis.confidence >= 0.33);
    assert!((analysis.confidence - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(analysis.sentiment, Sentiment::Negative);
    assert_eq!(analysis.topics, vec!["קריירה".to_string()]);
    assert_eq!(analysis.keywords, vec!["כותב", "עבודה", "ולחץ"]);
}

#[test]
fn blank_text_yields_fallback_record() {
    let analyzer = Analyzer::builtin();
    for text in ["", "   ", "\n\t "] {
        assert_eq!(analyzer.analyze(text), Analysis::empty("הרהורים"));
    }
    let record = analyzer.analyze(" ");
    assert_eq!(record.confidence, 0.0);
    assert_eq!(record.sentiment, Sentiment::Neutral);
    assert!(record.topics.is_empty() && record.keywords.is_empty());
}

#[test]
fn unmatched_text_falls_back_with_low_confidence() {
    let analysis = Analyzer::builtin().analyze("סתם משפט בלי שום דבר");
    assert_eq!(analysis.category, "הרהורים");
    assert_eq!(analysis.confidence, 0.3);
    assert!(analysis.is_low_confidence());
}

#[test]
fn confidence_stays_in_unit_range_and_category_is_declared() {
    let analyzer = Analyzer::builtin();
    let lexicon = analyzer.lexicon();
    let texts = [
        "צריך לעשות לזכור לקנות להתקשר לסדר לסיים",
        "רעיון",
        "שמח ועצוב",
        "hello world",
        "!!!",
    ];
    for text in texts {
        let analysis = analyzer.analyze(text);
        assert!((0.0..=1.0).contains(&analysis.confidence), "{text}");
        assert!(lexicon.has_category(&analysis.category), "{text}");
    }
    assert_eq!(analyzer.analyze(texts[0]).confidence, 1.0);
}

#[test]
fn analysis_is_idempotent() {
    let analyzer = Analyzer::builtin();
    let text = "מחר פגישה עם הבוס ואני דואג";
    assert_eq!(analyzer.analyze(text), analyzer.analyze(text));
}

#[test]
fn equal_counts_prefer_first_declared_category() {
    let analyzer = tie_analyzer();
    for _ in 0..20 {
        let analysis = analyzer.analyze("meeting then buy bread");
        assert_eq!(analysis.category, "errands");
        assert!((analysis.confidence - 1.0 / 3.0).abs() < 1e-9);
    }
    assert_eq!(analyzer.analyze("buy before the deadline meeting").category, "work");
}

#[test]
fn matches_respect_word_boundaries() {
    let analyzer = tie_analyzer();
    let analysis = analyzer.analyze("buyer of callbacks");
    assert_eq!(analysis.category, "misc");
    assert_eq!(analysis.confidence, 0.3);
}

#[test]
fn adding_a_topic_keyword_inserts_topic_in_declared_rank() {
    let analyzer = tie_analyzer();
    let base = analyzer.analyze("visit mom after gym");
    assert_eq!(base.topics, vec!["health".to_string(), "family".to_string()]);

    let extended = analyzer.analyze("visit mom after gym and pay rent");
    assert_eq!(
        extended.topics,
        vec!["health".to_string(), "money".to_string(), "family".to_string()]
    );
}

#[test]
fn keywords_are_capped_unique_and_filtered() {
    let analyzer = tie_analyzer().with_keyword_cap(3);
    let analysis = analyzer.analyze("the apple and an apple pie and pear plum fig kiwi");

    assert_eq!(analysis.keywords, vec!["apple", "pie", "pear"]);
    for keyword in &analysis.keywords {
        assert!(keyword.chars().count() > 2);
        assert!(!analyzer.lexicon().is_stop_word(keyword));
    }
}

#[test]
fn sentiment_ties_are_neutral() {
    let analyzer = tie_analyzer();
    assert_eq!(analyzer.analyze("great").sentiment, Sentiment::Positive);
    assert_eq!(analyzer.analyze("awful").sentiment, Sentiment::Negative);
    assert_eq!(analyzer.analyze("great but awful").sentiment, Sentiment::Neutral);
    assert_eq!(analyzer.analyze("nothing here").sentiment, Sentiment::Neutral);
}

#[test]
fn batch_matches_single_analysis_in_order() {
    let analyzer = Analyzer::builtin();
    let texts = ["צריך לקנות חלב", "", "רעיון חדש"];
    let batch = analyzer.analyze_batch(&texts);
    let single: Vec<Analysis> = texts.iter().map(|text| analyzer.analyze(text)).collect();
    assert_eq!(batch, single);
}
