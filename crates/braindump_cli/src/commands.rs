//! Chat line parsing.
//!
//! Lines starting with `/` are commands; everything else is note text.

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// Open a capture session.
    Dump,
    /// Close the capture session.
    Done,
    /// Category and topic overview (`/list`, `/topics`).
    List,
    Recent,
    Today,
    Week,
    /// Full-text search; the query may be blank.
    Search(String),
    Stats,
    /// Bulk clear; runs only with `confirm`.
    Clear { confirmed: bool },
    Quit,
    Unknown(String),
    /// Free text to capture.
    Text(String),
    Blank,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        let Some(body) = trimmed.strip_prefix('/') else {
            return Self::Text(trimmed.to_string());
        };

        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "dump" => Self::Dump,
            "done" => Self::Done,
            "list" | "topics" => Self::List,
            "recent" => Self::Recent,
            "today" => Self::Today,
            "week" => Self::Week,
            "search" => Self::Search(rest.to_string()),
            "stats" => Self::Stats,
            "clear" => Self::Clear {
                confirmed: rest.eq_ignore_ascii_case("confirm"),
            },
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}
