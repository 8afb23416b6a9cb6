//! Interactive shell
//!
//! Reads one command per line. Every verb has a short alias. Errors are
//! printed and the loop continues; only `quit` or end of input stops it.
//! Nothing is written to disk unless `save` is issued.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::knowledge::RuleId;
use crate::observability::Event;
use crate::parser::parse_fact;
use crate::session::Session;

use super::args::ListTarget;
use super::commands::{self, open_session};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{load_kb, read_document, save_kb};

/// (verb, aliases, usage)
const COMMANDS: &[(&str, &[&str], &str)] = &[
    ("add-fact", &["af"], "add-fact <Attr = Value>"),
    ("add-rule", &["ar"], "add-rule <SE ... ENTÃO Attr = Value>"),
    ("list-facts", &["lf"], "list-facts"),
    ("list-rules", &["lr"], "list-rules"),
    ("list-vars", &["lv"], "list-vars"),
    ("remove-fact", &["rf"], "remove-fact <Attr>"),
    ("remove-rule", &["rr"], "remove-rule <id>"),
    ("forward", &["fw"], "forward"),
    ("prove", &["bk"], "prove <Attr = Value>"),
    ("why", &["pq"], "why <Attr = Value>"),
    ("how", &[], "how <Attr = Value>"),
    ("diagnose", &[], "diagnose <Attr = Value>"),
    ("save", &["sv"], "save [path]"),
    ("load", &["ld"], "load [path]"),
    ("import", &["rt"], "import <path>"),
    ("undo", &["sd"], "undo"),
    ("history", &[], "history"),
    ("help", &["h"], "help"),
    ("quit", &["q", "exit"], "quit"),
];

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    AddFact(String),
    AddRule(String),
    List(ListTarget),
    RemoveFact(String),
    RemoveRule(RuleId),
    Forward,
    Prove(String),
    Why(String),
    How(String),
    Diagnose(String),
    Save(Option<PathBuf>),
    Load(Option<PathBuf>),
    Import(PathBuf),
    Undo,
    History,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> CliResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let verb = verb.to_lowercase();

        let (name, _, usage) = COMMANDS
            .iter()
            .find(|(name, aliases, _)| *name == verb || aliases.iter().any(|a| *a == verb))
            .ok_or_else(|| {
                CliError::unknown_command(format!("Unknown command '{}'. Type 'help'.", verb))
            })?;

        let arg = || -> CliResult<String> {
            if rest.is_empty() {
                Err(CliError::unknown_command(format!("Usage: {}", usage)))
            } else {
                Ok(rest.to_string())
            }
        };
        let optional_path = || (!rest.is_empty()).then(|| PathBuf::from(rest));

        let cmd = match *name {
            "add-fact" => Self::AddFact(arg()?),
            "add-rule" => Self::AddRule(arg()?),
            "list-facts" => Self::List(ListTarget::Facts),
            "list-rules" => Self::List(ListTarget::Rules),
            "list-vars" => Self::List(ListTarget::Vars),
            "remove-fact" => Self::RemoveFact(arg()?),
            "remove-rule" => {
                let raw = arg()?;
                let id = raw.trim_start_matches('#').parse::<RuleId>().map_err(|_| {
                    CliError::invalid_input(format!("Invalid rule id: '{}'", raw))
                })?;
                Self::RemoveRule(id)
            }
            "forward" => Self::Forward,
            "prove" => Self::Prove(arg()?),
            "why" => Self::Why(arg()?),
            "how" => Self::How(arg()?),
            "diagnose" => Self::Diagnose(arg()?),
            "save" => Self::Save(optional_path()),
            "load" => Self::Load(optional_path()),
            "import" => Self::Import(PathBuf::from(arg()?)),
            "undo" => Self::Undo,
            "history" => Self::History,
            "help" => Self::Help,
            _ => Self::Quit,
        };
        Ok(Some(cmd))
    }
}

/// Runs the shell until `quit` or end of input
pub fn run_shell<R: BufRead>(config: &Config, input: R, out: &mut dyn Write) -> CliResult<()> {
    let kb_path = config.kb_path();
    let mut session = open_session(config, load_kb(&kb_path)?);

    info!(
        event = %Event::SessionStart,
        path = %kb_path.display(),
        facts = session.kb().fact_count(),
        rules = session.kb().rule_count(),
        "shell started"
    );
    writeln!(out, "kbagent shell. Type 'help' for commands.")?;
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(cmd)) => {
                if let Err(e) = dispatch(config, &mut session, cmd, out) {
                    writeln!(out, "[ERROR] {}", e.message())?;
                }
            }
            Err(e) => writeln!(out, "[ERROR] {}", e.message())?,
        }
        prompt(out)?;
    }

    info!(
        event = %Event::SessionEnd,
        undo_depth = session.history().len(),
        "shell closed"
    );
    writeln!(out)?;
    Ok(())
}

fn prompt(out: &mut dyn Write) -> CliResult<()> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

fn dispatch(
    config: &Config,
    session: &mut Session,
    cmd: ShellCommand,
    out: &mut dyn Write,
) -> CliResult<()> {
    match cmd {
        ShellCommand::AddFact(text) => commands::add_fact(session, &text, out),
        ShellCommand::AddRule(text) => commands::add_rule(session, &text, out).map(|_| ()),
        ShellCommand::List(target) => commands::list(session.kb(), target, out),
        ShellCommand::RemoveFact(attr) => commands::remove_fact(session, &attr, out).map(|_| ()),
        ShellCommand::RemoveRule(id) => commands::remove_rule(session, id, out).map(|_| ()),
        ShellCommand::Forward => commands::forward(session, out).map(|_| ()),
        ShellCommand::Prove(text) => {
            let goal = parse_fact(&text)?;
            commands::prove(config, session, &goal.attr, &goal.value, out).map(|_| ())
        }
        ShellCommand::Why(text) => {
            let goal = parse_fact(&text)?;
            write!(out, "{}", session.why(&goal.attr, &goal.value))?;
            Ok(())
        }
        ShellCommand::How(text) => {
            let goal = parse_fact(&text)?;
            write!(out, "{}", session.how(&goal.attr, &goal.value))?;
            Ok(())
        }
        ShellCommand::Diagnose(text) => {
            let goal = parse_fact(&text)?;
            write!(out, "{}", session.diagnose(&goal.attr, &goal.value))?;
            Ok(())
        }
        ShellCommand::Save(path) => {
            let path = path.unwrap_or_else(|| config.kb_path());
            save_kb(&path, session.kb())?;
            writeln!(out, "[OK] Saved to {}.", path.display())?;
            Ok(())
        }
        ShellCommand::Load(path) => {
            let path = path.unwrap_or_else(|| config.kb_path());
            load(session, &path, out)
        }
        ShellCommand::Import(path) => commands::import(session, &path, out).map(|_| ()),
        ShellCommand::Undo => {
            match session.undo() {
                Some(label) => writeln!(out, "[OK] Undone: {}", label)?,
                None => writeln!(out, "Nothing to undo.")?,
            }
            Ok(())
        }
        ShellCommand::History => {
            if session.history().is_empty() {
                writeln!(out, "(no history)")?;
            }
            for (i, entry) in session.history().iter().enumerate() {
                writeln!(
                    out,
                    "{}. [{}] {}",
                    i + 1,
                    entry.taken_at.format("%H:%M:%S"),
                    entry.label
                )?;
            }
            Ok(())
        }
        ShellCommand::Help => help(out),
        ShellCommand::Quit => Ok(()),
    }
}

fn load(session: &mut Session, path: &Path, out: &mut dyn Write) -> CliResult<()> {
    let doc = read_document(path)?;
    session.load(doc)?;
    writeln!(
        out,
        "[OK] Loaded {}: {} fact(s), {} rule(s).",
        path.display(),
        session.kb().fact_count(),
        session.kb().rule_count()
    )?;
    Ok(())
}

fn help(out: &mut dyn Write) -> CliResult<()> {
    writeln!(out, "Commands:")?;
    for (_, aliases, usage) in COMMANDS {
        if aliases.is_empty() {
            writeln!(out, "  {}", usage)?;
        } else {
            writeln!(out, "  {:<40} ({})", usage, aliases.join(", "))?;
        }
    }
    Ok(())
}
