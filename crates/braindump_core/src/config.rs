//! Runtime configuration.
//!
//! # Responsibility
//! - Deserialize the TOML configuration file with a default for every field.
//! - Validate limits before any service is built.
//! - Build the analyzer the configuration describes.
//!
//! # Invariants
//! - A validated config never carries a zero keyword cap or display limit.

use crate::analysis::Analyzer;
use crate::lexicon::{Lexicon, LexiconError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration load/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    /// A field holds a value outside its accepted range.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    Lexicon(LexiconError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
            Self::Lexicon(err) => write!(f, "cannot load lexicon: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
            Self::Lexicon(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<LexiconError> for ConfigError {
    fn from(value: LexiconError) -> Self {
        Self::Lexicon(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Keep everything in memory and ignore `path`.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            in_memory: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log directory; logging stays off when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    #[serde(default = "default_keyword_cap")]
    pub keyword_cap: usize,
    /// Replacement lexicon document; the embedded one is used when unset.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_cap: default_keyword_cap(),
            lexicon_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Notes shown by the recent/today views.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Topics shown in the list view.
    #[serde(default = "default_topic_top_n")]
    pub topic_top_n: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
            topic_top_n: default_topic_top_n(),
            search_limit: default_search_limit(),
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("braindump.sqlite3")
}

fn default_log_level() -> String {
    crate::logging::default_log_level().to_string()
}

fn default_keyword_cap() -> usize {
    crate::analysis::keywords::DEFAULT_KEYWORD_CAP
}

fn default_list_limit() -> u32 {
    crate::service::note_service::DEFAULT_RECENT_LIMIT
}

fn default_topic_top_n() -> usize {
    5
}

fn default_search_limit() -> u32 {
    crate::search::fts::DEFAULT_SEARCH_LIMIT
}

impl CoreConfig {
    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Reads `path` when it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates a config document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.keyword_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "analysis.keyword_cap",
                reason: "must be at least 1",
            });
        }
        if self.display.list_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "display.list_limit",
                reason: "must be at least 1",
            });
        }
        if self.display.topic_top_n == 0 {
            return Err(ConfigError::Invalid {
                field: "display.topic_top_n",
                reason: "must be at least 1",
            });
        }
        if self.display.search_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "display.search_limit",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Builds the analyzer from the configured lexicon and keyword cap.
    pub fn build_analyzer(&self) -> Result<Analyzer, ConfigError> {
        let lexicon = match &self.analysis.lexicon_path {
            Some(path) => Arc::new(Lexicon::load(path)?),
            None => Lexicon::builtin(),
        };
        Ok(Analyzer::new(lexicon).with_keyword_cap(self.analysis.keyword_cap))
    }
}
