//! Aggregation over analyzed notes.
//!
//! # Responsibility
//! - Count notes per category (exactly one increment per note).
//! - Count notes per topic (fan-out over each note's topics).
//! - Count notes per UTC calendar day.
//!
//! # Invariants
//! - Count lists are sorted by descending count; ties keep first appearance.
//! - Date buckets always use UTC so bucketing is independent of origin zone.
//! - Callers decide which notes to pass (active only, window, owner).

use crate::lexicon::Lexicon;
use crate::model::analysis::Analysis;
use crate::model::note::Note;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One `(key, count)` row of a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub key: String,
    pub count: usize,
}

/// Category, topic and date counts over one set of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub categories: Vec<CountEntry>,
    pub topics: Vec<CountEntry>,
    pub dates: BTreeMap<NaiveDate, usize>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of notes that contributed to the summary.
    pub fn note_count(&self) -> usize {
        self.categories.iter().map(|entry| entry.count).sum()
    }

    /// Most frequent category, first-seen on ties.
    pub fn top_category(&self) -> Option<&CountEntry> {
        self.categories.first()
    }
}

/// Builds every grouping for `notes`.
///
/// `lexicon` is used to catch names that were never declared; such names are
/// defects and trip a debug assertion.
pub fn summarize<'a, I>(lexicon: &Lexicon, notes: I) -> Summary
where
    I: IntoIterator<Item = &'a Note>,
{
    let notes: Vec<&Note> = notes.into_iter().collect();
    let analyses = notes.iter().map(|note| &note.analysis);
    Summary {
        categories: category_counts(lexicon, analyses.clone()),
        topics: topic_counts(lexicon, analyses),
        dates: date_counts(notes.iter().copied()),
    }
}

/// Counts analyses per category.
pub fn category_counts<'a, I>(lexicon: &Lexicon, analyses: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a Analysis>,
{
    let mut counter = OrderedCounter::default();
    for analysis in analyses {
        debug_assert!(
            lexicon.has_category(&analysis.category),
            "undeclared category `{}` reached aggregation",
            analysis.category
        );
        counter.bump(&analysis.category);
    }
    counter.into_sorted()
}

/// Counts analyses per topic; one note may bump several topics.
pub fn topic_counts<'a, I>(lexicon: &Lexicon, analyses: I) -> Vec<CountEntry>
where
    I: IntoIterator<Item = &'a Analysis>,
{
    let mut counter = OrderedCounter::default();
    for analysis in analyses {
        for topic in &analysis.topics {
            debug_assert!(
                lexicon.has_topic(topic),
                "undeclared topic `{topic}` reached aggregation"
            );
            counter.bump(topic);
        }
    }
    counter.into_sorted()
}

/// Counts notes per UTC calendar day.
pub fn date_counts<'a, I>(notes: I) -> BTreeMap<NaiveDate, usize>
where
    I: IntoIterator<Item = &'a Note>,
{
    let mut buckets = BTreeMap::new();
    for note in notes {
        *buckets.entry(note.created_at.date_naive()).or_insert(0) += 1;
    }
    buckets
}

/// Keeps the first `n` entries of a sorted count list.
pub fn top_n(entries: &[CountEntry], n: usize) -> &[CountEntry] {
    &entries[..entries.len().min(n)]
}

#[derive(Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<CountEntry>,
}

impl OrderedCounter {
    fn bump(&mut self, key: &str) {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].count += 1;
            return;
        }
        self.index.insert(key.to_string(), self.entries.len());
        self.entries.push(CountEntry {
            key: key.to_string(),
            count: 1,
        });
    }

    fn into_sorted(mut self) -> Vec<CountEntry> {
        // Stable sort keeps first-appearance order among equal counts.
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        self.entries
    }
}
