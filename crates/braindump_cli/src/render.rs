//! Plain-text replies.
//!
//! # Invariants
//! - Replies never include note ids, owner ids or error chains.
//! - Long note text is cut to a fixed character width with `...`.

use braindump_core::aggregate::top_n;
use braindump_core::{
    Analysis, CloseReport, CountEntry, Lexicon, Note, SearchHit, UserProfile, UserStats,
    WindowReport,
};
use std::fmt::Write;

pub const TODAY_SHOWN: usize = 10;
pub const TODAY_WIDTH: usize = 50;
pub const RECENT_WIDTH: usize = 40;
pub const SEARCH_SHOWN: usize = 8;
pub const SEARCH_WIDTH: usize = 60;
const TAGS_SHOWN: usize = 3;

pub const HELP: &str = "\
Send any text and it is analyzed and saved right away.

Commands:
  /dump          start a brain dump; texts are collected silently
  /done          finish the dump, analyze and save everything
  /list          categories and top topics (/topics works too)
  /recent        your latest notes
  /today         what you wrote today
  /week          what you wrote this week, per day
  /search WORDS  find notes containing all WORDS
  /stats         personal statistics
  /clear         delete all notes (asks for confirmation)
  /help          this text
  /quit          leave";

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again.";

/// Cuts `text` to `width` characters, ending with `...` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub fn welcome(profile: &UserProfile) -> String {
    let name = profile
        .first_name
        .as_deref()
        .or(profile.username.as_deref())
        .unwrap_or("there");
    format!("Hi {name}! Write whatever is on your mind.\n\n{HELP}")
}

pub fn analysis_summary(lexicon: &Lexicon, analysis: &Analysis) -> String {
    let mut out = format!(
        "{} Category: {}",
        lexicon.category_glyph(&analysis.category),
        analysis.category
    );
    if !analysis.topics.is_empty() {
        let topics = analysis
            .topics
            .iter()
            .map(|topic| format!("{} {topic}", lexicon.topic_glyph(topic)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "\nTopics: {topics}");
    }
    if !analysis.keywords.is_empty() {
        let tags = analysis
            .keywords
            .iter()
            .take(TAGS_SHOWN)
            .map(|keyword| format!("#{keyword}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "\nTags: {tags}");
    }
    if analysis.is_low_confidence() {
        out.push_str("\n(not entirely sure about this one)");
    }
    out
}

pub fn saved(lexicon: &Lexicon, note: &Note) -> String {
    format!("✅ Saved!\n\n{}", analysis_summary(lexicon, &note.analysis))
}

pub fn dump_started(discarded: usize) -> String {
    let mut out = String::from("🌬️ Dump mode on. Send everything; I'll stay quiet until /done.");
    if discarded > 0 {
        let _ = write!(out, "\n({discarded} texts from an unfinished dump were dropped)");
    }
    out
}

pub fn buffered() -> &'static str {
    "✓"
}

pub fn close_report(lexicon: &Lexicon, report: &CloseReport) -> String {
    let flush = match report {
        CloseReport::NotActive => {
            return "You were not in dump mode. Use /dump to start.".to_string()
        }
        CloseReport::Empty => return "Nothing was captured.".to_string(),
        CloseReport::Flushed(flush) => flush,
    };

    let mut out = format!("✅ Done!\n💾 Saved {} notes", flush.persisted);
    if flush.failed > 0 {
        let _ = write!(out, " ({} could not be saved)", flush.failed);
    }
    out.push_str("\n\nBy category:");
    push_counts(&mut out, &flush.breakdown, |key| lexicon.category_glyph(key));
    out
}

/// Category overview plus the top topics.
pub fn overview(lexicon: &Lexicon, stats: &UserStats, topic_top_n: usize) -> String {
    if stats.categories.is_empty() {
        return "No notes yet. Start sharing! 💭".to_string();
    }
    let mut out = String::from("📊 Your notes\n\n📁 Categories:");
    push_counts(&mut out, &stats.categories, |key| lexicon.category_glyph(key));
    if !stats.topics.is_empty() {
        out.push_str("\n\n🏷️ Topics:");
        push_counts(&mut out, top_n(&stats.topics, topic_top_n), |key| {
            lexicon.topic_glyph(key)
        });
    }
    out
}

pub fn recent(lexicon: &Lexicon, notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes to show.".to_string();
    }
    let mut out = String::from("📝 Latest notes:");
    push_numbered(&mut out, lexicon, notes.iter(), RECENT_WIDTH);
    out
}

pub fn today(lexicon: &Lexicon, report: &WindowReport) -> String {
    if report.notes.is_empty() {
        return "Nothing written today. 🤔".to_string();
    }
    let mut out = format!("📅 Today you wrote {} notes:", report.notes.len());
    push_numbered(
        &mut out,
        lexicon,
        report.notes.iter().take(TODAY_SHOWN),
        TODAY_WIDTH,
    );
    push_more(&mut out, report.notes.len(), TODAY_SHOWN, "notes");
    out
}

/// Per-day counts, newest day first.
pub fn week(report: &WindowReport) -> String {
    if report.notes.is_empty() {
        return "Nothing written this week. 🤔".to_string();
    }
    let mut out = format!("📆 This week you wrote {} notes:", report.notes.len());
    for (day, count) in report.summary.dates.iter().rev() {
        let _ = write!(out, "\n• {} {day}: {count}", day.format("%A"));
    }
    out
}

pub fn search_usage() -> &'static str {
    "Usage: /search WORDS\nFor example: /search work"
}

pub fn search_results(lexicon: &Lexicon, query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results for '{query}' 🔍");
    }
    let mut out = format!("🔍 {} results for '{query}':", hits.len());
    push_numbered(
        &mut out,
        lexicon,
        hits.iter().take(SEARCH_SHOWN).map(|hit| &hit.note),
        SEARCH_WIDTH,
    );
    push_more(&mut out, hits.len(), SEARCH_SHOWN, "results");
    out
}

pub fn stats(lexicon: &Lexicon, stats: &UserStats) -> String {
    if stats.total_notes == 0 {
        return "No statistics yet. Start sharing! 💭".to_string();
    }
    let mut out = format!("📈 Your statistics\n\n💭 Total notes: {}", stats.total_notes);
    if let Some(profile) = &stats.profile {
        let _ = write!(out, "\n📅 Member since: {}", profile.joined_at.format("%d/%m/%Y"));
    }
    if let Some(top) = stats.top_category() {
        let _ = write!(
            out,
            "\n🏆 Most frequent: {} {} ({})",
            lexicon.category_glyph(&top.key),
            top.key,
            top.count
        );
    }
    out
}

pub fn clear_prompt() -> &'static str {
    "⚠️ This deletes ALL your notes. Send /clear confirm to proceed."
}

pub fn cleared(count: u64) -> String {
    format!("🗑️ Deleted {count} notes. Start fresh whenever you like! 🌱")
}

pub fn unknown(name: &str) -> String {
    format!("Unknown command /{name}. Try /help.")
}

fn push_counts<'a>(out: &mut String, entries: &[CountEntry], glyph: impl Fn(&str) -> &'a str) {
    for entry in entries {
        let _ = write!(out, "\n  {} {}: {}", glyph(&entry.key), entry.key, entry.count);
    }
}

fn push_numbered<'n>(
    out: &mut String,
    lexicon: &Lexicon,
    notes: impl Iterator<Item = &'n Note>,
    width: usize,
) {
    for (index, note) in notes.enumerate() {
        let _ = write!(
            out,
            "\n{}. {} {}",
            index + 1,
            lexicon.category_glyph(&note.analysis.category),
            truncate(&note.raw_text, width)
        );
    }
}

fn push_more(out: &mut String, total: usize, shown: usize, noun: &str) {
    if total > shown {
        let _ = write!(out, "\n...and {} more {noun}", total - shown);
    }
}
