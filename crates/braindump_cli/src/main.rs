//! Line-oriented chat front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the note store.
//! - Read one message per stdin line and print the reply.

mod app;
mod commands;
mod render;

use anyhow::{Context, Result};
use app::{App, Outcome};
use braindump_core::{
    init_logging_from_config, open_db, open_db_in_memory, CoreConfig, DisplayInfo, OwnerId,
};
use clap::Parser;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Brain-dump note taker: send thoughts, get them classified and stored.
#[derive(Parser)]
#[command(name = "braindump", version, about)]
struct Cli {
    /// Configuration file (defaults apply when it does not exist).
    #[arg(short, long, default_value = "braindump.toml")]
    config: PathBuf,

    /// SQLite database file, overriding the config.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep notes in memory only.
    #[arg(long, conflicts_with = "db")]
    in_memory: bool,

    /// Chat user id the session acts as.
    #[arg(short, long, default_value_t = 1)]
    user: OwnerId,

    /// Display name used on /start.
    #[arg(long)]
    name: Option<String>,

    /// Log directory, overriding the config.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level, overriding the config.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CoreConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(db) = cli.db {
        config.database.path = db;
        config.database.in_memory = false;
    }
    if cli.in_memory {
        config.database.in_memory = true;
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging_from_config(&config.logging).context("starting logging")?;

    let conn = if config.database.in_memory {
        open_db_in_memory().context("opening in-memory store")?
    } else {
        open_db(&config.database.path)
            .with_context(|| format!("opening {}", config.database.path.display()))?
    };
    let analyzer = config.build_analyzer().context("building analyzer")?;
    let display = DisplayInfo {
        username: None,
        first_name: cli.name,
    };
    let app = App::new(&conn, analyzer, cli.user, display, config.display)
        .context("preparing note store")?;

    info!(
        "event=cli_start module=cli status=ok owner={} in_memory={}",
        cli.user, config.database.in_memory
    );
    run(&app, io::stdin().lock(), io::stdout().lock())
}

fn run(app: &App<'_>, input: impl BufRead, mut output: impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line.context("reading input")?;
        match app.handle_line(&line) {
            Outcome::Reply(text) => writeln!(output, "{text}\n")?,
            Outcome::Quit => break,
            Outcome::Nothing => {}
        }
        output.flush()?;
    }
    Ok(())
}
