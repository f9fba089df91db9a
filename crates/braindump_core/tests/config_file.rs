use braindump_core::{ConfigError, CoreConfig, LexiconError};
use std::fs;

const SMALL_LEXICON: &str = r#"
fallback_category = "misc"

[[categories]]
name = "chores"
glyph = "🧹"
triggers = ["laundry", "dishes"]

[[categories]]
name = "misc"
"#;

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, CoreConfig::default());

    assert!(matches!(
        CoreConfig::load(dir.path().join("absent.toml")),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn file_config_can_swap_the_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.toml");
    fs::write(&lexicon_path, SMALL_LEXICON).unwrap();
    let config_path = dir.path().join("braindump.toml");
    fs::write(
        &config_path,
        format!(
            "[database]\nin_memory = true\n\n[analysis]\nkeyword_cap = 1\nlexicon_path = {:?}\n",
            lexicon_path.display().to_string()
        ),
    )
    .unwrap();

    let config = CoreConfig::load(&config_path).unwrap();
    assert!(config.database.in_memory);

    let analyzer = config.build_analyzer().unwrap();
    let analysis = analyzer.analyze("do the laundry and dishes");
    assert_eq!(analysis.category, "chores");
    assert_eq!(analysis.keywords.len(), 1);
    assert_eq!(analyzer.category_glyph("chores"), "🧹");
}

#[test]
fn broken_lexicon_surfaces_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon_path = dir.path().join("lexicon.toml");
    fs::write(
        &lexicon_path,
        "fallback_category = \"gone\"\n\n[[categories]]\nname = \"misc\"\n",
    )
    .unwrap();

    let mut config = CoreConfig::default();
    config.analysis.lexicon_path = Some(lexicon_path);
    assert!(matches!(
        config.build_analyzer(),
        Err(ConfigError::Lexicon(LexiconError::UnknownFallback(name))) if name == "gone"
    ));
}
