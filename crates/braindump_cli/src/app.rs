//! Command dispatch for one chat user.

use crate::commands::Command;
use crate::render;
use braindump_core::config::DisplayConfig;
use braindump_core::{
    search_notes, Analyzer, CaptureService, DisplayInfo, InMemorySessionStore, IngestReport,
    NoteSearchQuery, NoteService, OwnerId, RepoResult, SqliteNoteRepository,
    SqliteProfileRepository,
};
use chrono::Utc;
use log::warn;
use rusqlite::Connection;
use std::fmt::Display;

/// What the front end should do after one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    Quit,
    Nothing,
}

type SqliteCapture<'conn> = CaptureService<
    InMemorySessionStore,
    SqliteNoteRepository<'conn>,
    SqliteProfileRepository<'conn>,
>;
type SqliteNotes<'conn> = NoteService<SqliteNoteRepository<'conn>, SqliteProfileRepository<'conn>>;

pub struct App<'conn> {
    owner: OwnerId,
    display: DisplayInfo,
    limits: DisplayConfig,
    conn: &'conn Connection,
    capture: SqliteCapture<'conn>,
    notes: SqliteNotes<'conn>,
}

impl<'conn> App<'conn> {
    pub fn new(
        conn: &'conn Connection,
        analyzer: Analyzer,
        owner: OwnerId,
        display: DisplayInfo,
        limits: DisplayConfig,
    ) -> RepoResult<Self> {
        let note_repo = SqliteNoteRepository::try_new(conn)?;
        let profile_repo = SqliteProfileRepository::try_new(conn)?;
        let lexicon = analyzer.shared_lexicon();

        Ok(Self {
            owner,
            display,
            limits,
            conn,
            capture: CaptureService::new(
                InMemorySessionStore::new(),
                analyzer,
                note_repo,
                profile_repo,
            ),
            notes: NoteService::new(note_repo, profile_repo, lexicon),
        })
    }

    pub fn handle_line(&self, line: &str) -> Outcome {
        self.handle(Command::parse(line))
    }

    pub fn handle(&self, command: Command) -> Outcome {
        let lexicon = self.capture.analyzer().lexicon();
        let owner = self.owner;

        let reply = match command {
            Command::Blank => return Outcome::Nothing,
            Command::Quit => return Outcome::Quit,
            Command::Start => reply_or_failure(
                "start",
                self.notes.register(owner, &self.display),
                |profile| render::welcome(&profile),
            ),
            Command::Help => render::HELP.to_string(),
            Command::Dump => render::dump_started(self.capture.open_capture(owner).discarded),
            Command::Done => render::close_report(lexicon, &self.capture.close_capture(owner)),
            Command::Text(text) => reply_or_failure(
                "capture",
                self.capture.ingest_text(owner, text),
                |report| match report {
                    IngestReport::Buffered { .. } => render::buffered().to_string(),
                    IngestReport::Saved { note } => render::saved(lexicon, &note),
                },
            ),
            Command::List => reply_or_failure("list", self.notes.stats(owner), |stats| {
                render::overview(lexicon, &stats, self.limits.topic_top_n)
            }),
            Command::Recent => reply_or_failure(
                "recent",
                self.notes.recent(owner, self.limits.list_limit),
                |notes| render::recent(lexicon, &notes),
            ),
            Command::Today => reply_or_failure(
                "today",
                self.notes.window(owner, Utc::now(), 1),
                |report| render::today(lexicon, &report),
            ),
            Command::Week => reply_or_failure(
                "week",
                self.notes.window(owner, Utc::now(), 7),
                |report| render::week(&report),
            ),
            Command::Search(text) if text.is_empty() => render::search_usage().to_string(),
            Command::Search(text) => {
                let mut query = NoteSearchQuery::new(owner, text.as_str());
                query.limit = self.limits.search_limit;
                reply_or_failure("search", search_notes(self.conn, &query), |hits| {
                    render::search_results(lexicon, &text, &hits)
                })
            }
            Command::Stats => reply_or_failure("stats", self.notes.stats(owner), |stats| {
                render::stats(lexicon, &stats)
            }),
            Command::Clear { confirmed: false } => render::clear_prompt().to_string(),
            Command::Clear { confirmed: true } => {
                reply_or_failure("clear", self.notes.clear(owner), render::cleared)
            }
            Command::Unknown(name) => render::unknown(&name),
        };
        Outcome::Reply(reply)
    }
}

fn reply_or_failure<T, E: Display>(
    command: &str,
    result: Result<T, E>,
    render: impl FnOnce(T) -> String,
) -> String {
    match result {
        Ok(value) => render(value),
        Err(err) => {
            warn!("event=command module=cli status=error command={command} error={err}");
            render::GENERIC_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Outcome};
    use braindump_core::config::DisplayConfig;
    use braindump_core::{open_db_in_memory, Analyzer, DisplayInfo};

    fn reply(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[test]
    fn dump_session_collects_then_summarizes() {
        let conn = open_db_in_memory().unwrap();
        let app = App::new(
            &conn,
            Analyzer::builtin(),
            7,
            DisplayInfo::default(),
            DisplayConfig::default(),
        )
        .unwrap();

        assert!(reply(app.handle_line("/dump")).contains("Dump mode on"));
        assert_eq!(reply(app.handle_line("צריך לקנות חלב")), "✓");
        assert_eq!(reply(app.handle_line("רעיון לאפליקציה")), "✓");
        let summary = reply(app.handle_line("/done"));
        assert!(summary.contains("Saved 2 notes"));
        assert!(summary.contains("משימות: 1"));

        assert!(reply(app.handle_line("/done")).contains("not in dump mode"));
        assert!(reply(app.handle_line("/stats")).contains("Total notes: 2"));
    }

    #[test]
    fn immediate_text_is_saved_and_searchable() {
        let conn = open_db_in_memory().unwrap();
        let app = App::new(
            &conn,
            Analyzer::builtin(),
            7,
            DisplayInfo::default(),
            DisplayConfig::default(),
        )
        .unwrap();

        assert!(reply(app.handle_line("אני כותב על עבודה ולחץ")).contains("עבודה"));
        assert!(reply(app.handle_line("/search עבודה")).contains("1 results"));
        assert!(reply(app.handle_line("/search")).starts_with("Usage"));
        assert!(reply(app.handle_line("/clear")).contains("/clear confirm"));
        assert!(reply(app.handle_line("/clear confirm")).contains("Deleted 1 notes"));
        assert!(reply(app.handle_line("/today")).contains("Nothing written today"));
        assert_eq!(app.handle_line("/quit"), Outcome::Quit);
        assert_eq!(app.handle_line("  "), Outcome::Nothing);
    }
}
