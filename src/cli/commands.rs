//! CLI command implementations
//!
//! One-shot commands load the knowledge base file (empty if absent), act
//! through a [`Session`], and save only when the store changed. The
//! printing helpers here are shared with the interactive shell.

use std::io::{self, Write};
use std::path::Path;

use crate::explain::{Explanation, ExplanationNode};
use crate::knowledge::{KnowledgeBase, RuleId, DEFAULT_EXAMPLE_VALUES};
use crate::observability::init_logging;
use crate::parser::parse_fact;
use crate::session::Session;
use crate::value::{parse_value, Value};

use super::args::{Cli, Command, ListTarget};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{load_kb, read_text, save_kb};
use super::shell::run_shell;

/// Main entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::resolve(cli.config.as_deref())?
        .with_overrides(cli.kb.as_deref(), cli.max_iterations)?;

    // Logging is best effort.
    if let Err(e) = init_logging(&config.log_level, config.format()?) {
        eprintln!("{}", e);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Shell => {
            let stdin = io::stdin();
            run_shell(&config, stdin.lock(), &mut out)
        }
        command => run_command(&config, command, &mut out),
    }
}

/// Runs one non-interactive command against the configured file
pub fn run_command(config: &Config, command: Command, out: &mut dyn Write) -> CliResult<()> {
    if command == Command::Shell {
        return Err(CliError::unknown_command("'shell' is interactive, run it directly"));
    }

    let kb_path = config.kb_path();
    let mut session = open_session(config, load_kb(&kb_path)?);

    let changed = match command {
        Command::AddFact { fact } => {
            add_fact(&mut session, &fact.join(" "), out)?;
            true
        }
        Command::RemoveFact { attr } => remove_fact(&mut session, &attr, out)?,
        Command::AddRule { rule } => {
            add_rule(&mut session, &rule.join(" "), out)?;
            true
        }
        Command::RemoveRule { id } => remove_rule(&mut session, id, out)?,
        Command::List { target } => {
            list(session.kb(), target, out)?;
            false
        }
        Command::Forward => forward(&mut session, out)?,
        Command::Prove { attr, value } => {
            prove(config, &mut session, &attr, &parse_value(&value), out)?
        }
        Command::Why { attr, value } => {
            write_reloaded(&session.why(&attr, &parse_value(&value)), out)?;
            false
        }
        Command::How { attr, value } => {
            write_reloaded(&session.how(&attr, &parse_value(&value)), out)?;
            false
        }
        Command::Diagnose { attr, value } => {
            write!(out, "{}", session.diagnose(&attr, &parse_value(&value)))?;
            false
        }
        Command::Import { file } => import(&mut session, &file, out)?,
        Command::Shell => false,
    };

    if changed {
        save_kb(&kb_path, session.kb())?;
    }
    Ok(())
}

/// Session over `kb` with the configured engine limits
pub fn open_session(config: &Config, kb: KnowledgeBase) -> Session {
    Session::new(kb).with_limits(config.max_iterations, config.max_proof_depth)
}

/// Writes an explanation built from a freshly loaded file.
///
/// Justifications are not persisted, so every loaded fact reads as given.
fn write_reloaded(explanation: &Explanation, out: &mut dyn Write) -> CliResult<()> {
    write!(out, "{}", explanation)?;
    if matches!(explanation.root, ExplanationNode::Given { .. }) {
        writeln!(
            out,
            "(derivations are not saved between commands; use 'shell' to explain derived facts)"
        )?;
    }
    Ok(())
}

pub(crate) fn add_fact(session: &mut Session, text: &str, out: &mut dyn Write) -> CliResult<()> {
    let fact = parse_fact(text)?;
    session.add_fact(&fact.attr, fact.value.clone())?;
    writeln!(out, "[OK] Fact added: {}", fact)?;
    Ok(())
}

pub(crate) fn remove_fact(session: &mut Session, attr: &str, out: &mut dyn Write) -> CliResult<bool> {
    match session.remove_fact(attr.trim()) {
        Some(value) => {
            writeln!(out, "[OK] Fact removed: {} = {}", attr.trim(), value)?;
            Ok(true)
        }
        None => {
            writeln!(out, "No fact for '{}'.", attr.trim())?;
            Ok(false)
        }
    }
}

pub(crate) fn add_rule(session: &mut Session, text: &str, out: &mut dyn Write) -> CliResult<RuleId> {
    let id = session.add_rule_text(text)?;
    writeln!(out, "[OK] Rule #{} added.", id)?;
    Ok(id)
}

pub(crate) fn remove_rule(session: &mut Session, id: RuleId, out: &mut dyn Write) -> CliResult<bool> {
    if session.remove_rule(id) {
        writeln!(out, "[OK] Rule #{} removed.", id)?;
        Ok(true)
    } else {
        writeln!(out, "No rule #{}.", id)?;
        Ok(false)
    }
}

pub(crate) fn list(kb: &KnowledgeBase, target: ListTarget, out: &mut dyn Write) -> CliResult<()> {
    match target {
        ListTarget::Facts => {
            if kb.fact_count() == 0 {
                writeln!(out, "(no facts)")?;
            }
            for fact in kb.facts() {
                match kb.justification(&fact.attr) {
                    Some(j) => writeln!(out, "- {} [{}]", fact, j.provenance)?,
                    None => writeln!(out, "- {}", fact)?,
                }
            }
        }
        ListTarget::Rules => {
            if kb.rule_count() == 0 {
                writeln!(out, "(no rules)")?;
            }
            for rule in kb.rules() {
                writeln!(out, "#{}: {}", rule.id, rule.display_text())?;
            }
        }
        ListTarget::Vars => {
            writeln!(out, "Attributes: {}", join_or_none(&kb.attributes()))?;
            writeln!(out, "Condition attributes (facts):")?;
            for attr in kb.fact_attributes() {
                let examples = kb.example_values(attr, DEFAULT_EXAMPLE_VALUES);
                writeln!(out, "  {} (e.g. {})", attr, join_values(&examples))?;
            }
            writeln!(out, "Conclusion attributes (goals):")?;
            for attr in kb.goal_attributes() {
                let values = kb.goal_values(attr, None);
                writeln!(out, "  {} -> {}", attr, join_values(&values))?;
            }
        }
    }
    Ok(())
}

pub(crate) fn forward(session: &mut Session, out: &mut dyn Write) -> CliResult<bool> {
    let outcome = session.forward();
    if outcome.is_empty() {
        writeln!(out, "No new facts.")?;
        return Ok(false);
    }

    writeln!(
        out,
        "Derived {} fact(s) in {} round(s):",
        outcome.len(),
        outcome.rounds
    )?;
    for d in &outcome.derived {
        writeln!(out, "- {} (Rule #{}, iteration {})", d.fact, d.rule_id, d.iteration)?;
    }
    if !outcome.reached_fixpoint {
        writeln!(out, "(stopped at the iteration cap)")?;
    }
    Ok(true)
}

pub(crate) fn prove(
    config: &Config,
    session: &mut Session,
    attr: &str,
    value: &Value,
    out: &mut dyn Write,
) -> CliResult<bool> {
    let attr = attr.trim();
    let proved = session.prove(attr, value);

    if proved {
        writeln!(out, "[OK] Proved {} = {}", attr, value)?;
        if config.explain_after_prove {
            write!(out, "{}", session.how(attr, value))?;
        }
    } else {
        writeln!(out, "[FAIL] Could not prove {} = {}", attr, value)?;
        if config.explain_after_prove {
            write!(out, "{}", session.diagnose(attr, value))?;
        }
    }
    Ok(proved)
}

pub(crate) fn import(session: &mut Session, path: &Path, out: &mut dyn Write) -> CliResult<bool> {
    let content = read_text(path)?;
    let report = session.import(&content);

    writeln!(out, "[OK] {} rule(s) imported.", report.added_count())?;
    if !report.is_clean() {
        writeln!(out, "[WARN] Some lines were not imported:")?;
        for issue in &report.issues {
            writeln!(out, "  {}", issue)?;
        }
    }
    Ok(report.added_count() > 0)
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn join_values(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    if rendered.is_empty() {
        "(none)".to_string()
    } else {
        rendered.join(", ")
    }
}
