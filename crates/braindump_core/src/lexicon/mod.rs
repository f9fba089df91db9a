//! Lexicon tables for category, topic and sentiment matching.
//!
//! # Responsibility
//! - Parse a TOML lexicon document into typed, precompiled tables.
//! - Expose declared category/topic order for ranking and tie-breaks.
//! - Provide display glyph lookups.
//!
//! # Invariants
//! - Tables are immutable after construction; share them via `Arc`.
//! - Categories and topics keep the order they were declared in.
//! - The fallback category is always one of the declared categories.

mod phrase;

pub use phrase::Phrase;

use log::info;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BUILTIN_LEXICON_TOML: &str = include_str!("builtin.toml");
const DEFAULT_CATEGORY_GLYPH: &str = "📝";
const DEFAULT_TOPIC_GLYPH: &str = "🏷️";

static BUILTIN_LEXICON: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    Arc::new(Lexicon::from_toml_str(BUILTIN_LEXICON_TOML).expect("valid builtin lexicon"))
});

/// Lexicon construction error.
#[derive(Debug)]
pub enum LexiconError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    NoCategories,
    UnknownFallback(String),
    EmptyName {
        kind: &'static str,
    },
    DuplicateName {
        kind: &'static str,
        name: String,
    },
    EmptyPhrase {
        owner: String,
    },
    InvalidPattern {
        phrase: String,
        source: regex::Error,
    },
}

impl Display for LexiconError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read lexicon `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid lexicon document: {err}"),
            Self::NoCategories => write!(f, "lexicon must declare at least one category"),
            Self::UnknownFallback(name) => {
                write!(f, "fallback category `{name}` is not a declared category")
            }
            Self::EmptyName { kind } => write!(f, "{kind} name must not be empty"),
            Self::DuplicateName { kind, name } => write!(f, "duplicate {kind} name `{name}`"),
            Self::EmptyPhrase { owner } => write!(f, "empty phrase declared for `{owner}`"),
            Self::InvalidPattern { phrase, source } => {
                write!(f, "cannot compile phrase `{phrase}`: {source}")
            }
        }
    }
}

impl Error for LexiconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for LexiconError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLexicon {
    fallback_category: String,
    #[serde(default)]
    proclitics: Vec<String>,
    #[serde(default)]
    stop_words: Vec<String>,
    default_category_glyph: Option<String>,
    default_topic_glyph: Option<String>,
    #[serde(default)]
    sentiment: RawSentiment,
    categories: Vec<RawCategory>,
    #[serde(default)]
    topics: Vec<RawTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSentiment {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    name: String,
    glyph: Option<String>,
    #[serde(default)]
    triggers: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTopic {
    name: String,
    glyph: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

/// One category with its trigger phrases.
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    name: String,
    glyph: String,
    triggers: Vec<Phrase>,
}

impl CategoryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn triggers(&self) -> &[Phrase] {
        &self.triggers
    }
}

/// One topic with its keyword phrases.
#[derive(Debug, Clone)]
pub struct TopicEntry {
    name: String,
    glyph: String,
    keywords: Vec<Phrase>,
}

impl TopicEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn keywords(&self) -> &[Phrase] {
        &self.keywords
    }
}

/// Immutable matching tables shared by every analysis.
#[derive(Debug, Clone)]
pub struct Lexicon {
    categories: Vec<CategoryEntry>,
    topics: Vec<TopicEntry>,
    fallback_index: usize,
    positive: Vec<Phrase>,
    negative: Vec<Phrase>,
    stop_words: HashSet<String>,
    default_category_glyph: String,
    default_topic_glyph: String,
}

impl Lexicon {
    /// Returns the lexicon embedded in the binary.
    ///
    /// Built on first access and shared afterwards.
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN_LEXICON)
    }

    /// Reads and compiles a lexicon document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_toml_str(&source)?;
        info!(
            "event=lexicon_load module=lexicon status=ok categories={} topics={}",
            lexicon.categories.len(),
            lexicon.topics.len()
        );
        Ok(lexicon)
    }

    /// Compiles a lexicon from TOML source.
    ///
    /// Every phrase is normalized and compiled up front; nothing is mutated
    /// afterwards.
    pub fn from_toml_str(source: &str) -> Result<Self, LexiconError> {
        let raw: RawLexicon = toml::from_str(source)?;
        Self::build(raw)
    }

    fn build(raw: RawLexicon) -> Result<Self, LexiconError> {
        if raw.categories.is_empty() {
            return Err(LexiconError::NoCategories);
        }

        let proclitics = raw
            .proclitics
            .iter()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();
        let default_category_glyph = raw
            .default_category_glyph
            .unwrap_or_else(|| DEFAULT_CATEGORY_GLYPH.to_string());
        let default_topic_glyph = raw
            .default_topic_glyph
            .unwrap_or_else(|| DEFAULT_TOPIC_GLYPH.to_string());

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(raw.categories.len());
        for category in raw.categories {
            let name = checked_name("category", &category.name, &mut seen)?;
            let triggers = compile_all(&name, &category.triggers, &proclitics)?;
            categories.push(CategoryEntry {
                glyph: category
                    .glyph
                    .unwrap_or_else(|| default_category_glyph.clone()),
                name,
                triggers,
            });
        }

        let mut seen = HashSet::new();
        let mut topics = Vec::with_capacity(raw.topics.len());
        for topic in raw.topics {
            let name = checked_name("topic", &topic.name, &mut seen)?;
            let keywords = compile_all(&name, &topic.keywords, &proclitics)?;
            topics.push(TopicEntry {
                glyph: topic.glyph.unwrap_or_else(|| default_topic_glyph.clone()),
                name,
                keywords,
            });
        }

        let fallback = raw.fallback_category.trim();
        let fallback_index = categories
            .iter()
            .position(|entry| entry.name == fallback)
            .ok_or_else(|| LexiconError::UnknownFallback(fallback.to_string()))?;

        let positive = compile_all("sentiment.positive", &raw.sentiment.positive, &proclitics)?;
        let negative = compile_all("sentiment.negative", &raw.sentiment.negative, &proclitics)?;
        let stop_words = raw
            .stop_words
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        Ok(Self {
            categories,
            topics,
            fallback_index,
            positive,
            negative,
            stop_words,
            default_category_glyph,
            default_topic_glyph,
        })
    }

    /// Categories in declared order.
    pub fn categories(&self) -> &[CategoryEntry] {
        &self.categories
    }

    /// Topics in declared (canonical ranking) order.
    pub fn topics(&self) -> &[TopicEntry] {
        &self.topics
    }

    /// Category assigned when no trigger matches.
    pub fn fallback_category(&self) -> &str {
        &self.categories[self.fallback_index].name
    }

    pub fn positive_phrases(&self) -> &[Phrase] {
        &self.positive
    }

    pub fn negative_phrases(&self) -> &[Phrase] {
        &self.negative
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|entry| entry.name == name)
    }

    pub fn has_topic(&self, name: &str) -> bool {
        self.topic_rank(name).is_some()
    }

    /// Position of `name` in the canonical topic order.
    pub fn topic_rank(&self, name: &str) -> Option<usize> {
        self.topics.iter().position(|entry| entry.name == name)
    }

    /// Display glyph for a category, or the default glyph for unknown names.
    pub fn category_glyph(&self, name: &str) -> &str {
        self.categories
            .iter()
            .find(|entry| entry.name == name)
            .map_or(self.default_category_glyph.as_str(), CategoryEntry::glyph)
    }

    /// Display glyph for a topic, or the default glyph for unknown names.
    pub fn topic_glyph(&self, name: &str) -> &str {
        self.topics
            .iter()
            .find(|entry| entry.name == name)
            .map_or(self.default_topic_glyph.as_str(), TopicEntry::glyph)
    }
}

fn checked_name(
    kind: &'static str,
    raw: &str,
    seen: &mut HashSet<String>,
) -> Result<String, LexiconError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LexiconError::EmptyName { kind });
    }
    if !seen.insert(name.to_string()) {
        return Err(LexiconError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

fn compile_all(
    owner: &str,
    phrases: &[String],
    proclitics: &[String],
) -> Result<Vec<Phrase>, LexiconError> {
    phrases
        .iter()
        .map(|raw| Phrase::compile(owner, raw, proclitics))
        .collect()
}
