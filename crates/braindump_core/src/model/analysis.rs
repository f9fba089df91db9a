//! Analysis record produced for every captured text.
//!
//! # Responsibility
//! - Define the immutable result shape of the text analysis pipeline.
//! - Provide the fixed fallback record used for blank input.
//!
//! # Invariants
//! - `category` always holds exactly one declared category name.
//! - `confidence` stays within `[0.0, 1.0]`.
//! - `topics` and `keywords` never contain duplicates.

use serde::{Deserialize, Serialize};

/// Coarse polarity assigned by lexicon voting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    /// Default when neither side wins the vote.
    #[default]
    Neutral,
}

impl Sentiment {
    /// Stable storage/wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Parses a storage value produced by [`Sentiment::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Result of analyzing one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Winning category, or the lexicon fallback category.
    pub category: String,
    /// Detected topics in canonical lexicon order.
    pub topics: Vec<String>,
    /// Surface keywords in first-occurrence order.
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    /// Category confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Analysis {
    /// Confidence reported when no category trigger matched.
    pub const FALLBACK_CONFIDENCE: f64 = 0.3;

    /// Fixed record returned for empty or whitespace-only input.
    pub fn empty(fallback_category: impl Into<String>) -> Self {
        Self {
            category: fallback_category.into(),
            topics: Vec::new(),
            keywords: Vec::new(),
            sentiment: Sentiment::Neutral,
            confidence: 0.0,
        }
    }

    /// Returns whether the classifier was unsure about the category.
    pub fn is_low_confidence(&self) -> bool {
        self.confidence < 0.5
    }
}
