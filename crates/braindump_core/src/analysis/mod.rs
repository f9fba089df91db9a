//! Deterministic text analysis pipeline.
//!
//! # Responsibility
//! - Normalize raw text once and feed it to every sub-analysis.
//! - Assemble the immutable [`Analysis`] record.
//!
//! # Invariants
//! - Analysis is pure: the same text always yields the same record.
//! - Blank input short-circuits to [`Analysis::empty`] without matching.
//! - The analyzer holds only immutable tables and is safe to share across
//!   threads.

pub mod category;
pub mod keywords;
pub mod normalize;
pub mod sentiment;
pub mod topic;

use crate::lexicon::Lexicon;
use crate::model::analysis::Analysis;
use category::classify_category;
use keywords::{extract_keywords, DEFAULT_KEYWORD_CAP};
use log::debug;
use normalize::normalize;
use sentiment::score_sentiment;
use std::sync::Arc;
use topic::detect_topics;

/// Composes classification, topic detection, keyword extraction and
/// sentiment scoring over one shared lexicon.
#[derive(Debug, Clone)]
pub struct Analyzer {
    lexicon: Arc<Lexicon>,
    keyword_cap: usize,
}

impl Analyzer {
    /// Creates an analyzer using the default keyword cap.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            keyword_cap: DEFAULT_KEYWORD_CAP,
        }
    }

    /// Creates an analyzer over the embedded lexicon.
    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin())
    }

    /// Overrides the maximum number of extracted keywords.
    pub fn with_keyword_cap(mut self, cap: usize) -> Self {
        self.keyword_cap = cap;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Shared handle to the lexicon, for collaborators that aggregate.
    pub fn shared_lexicon(&self) -> Arc<Lexicon> {
        Arc::clone(&self.lexicon)
    }

    pub fn keyword_cap(&self) -> usize {
        self.keyword_cap
    }

    /// Analyzes one raw text.
    pub fn analyze(&self, text: &str) -> Analysis {
        if text.trim().is_empty() {
            return Analysis::empty(self.lexicon.fallback_category());
        }

        let normalized = normalize(text);
        let (category, confidence) = classify_category(&self.lexicon, &normalized);
        let analysis = Analysis {
            category: category.to_string(),
            topics: detect_topics(&self.lexicon, &normalized),
            keywords: extract_keywords(&self.lexicon, &normalized, self.keyword_cap),
            sentiment: score_sentiment(&self.lexicon, &normalized),
            confidence,
        };

        debug!(
            "event=analyze module=analysis status=ok topics={} keywords={} sentiment={}",
            analysis.topics.len(),
            analysis.keywords.len(),
            analysis.sentiment.as_str()
        );
        analysis
    }

    /// Analyzes texts in order, one record per input.
    pub fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Analysis> {
        texts.iter().map(|text| self.analyze(text.as_ref())).collect()
    }

    pub fn category_glyph(&self, category: &str) -> &str {
        self.lexicon.category_glyph(category)
    }

    pub fn topic_glyph(&self, topic: &str) -> &str {
        self.lexicon.topic_glyph(topic)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::builtin()
    }
}
