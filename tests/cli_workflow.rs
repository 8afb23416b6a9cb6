//! CLI Workflow Tests
//!
//! Drives the command layer the way a user would:
//! - a config file selects the knowledge base path and limits
//! - one-shot commands persist between invocations
//! - the shell loads the same file and saves only on request

use std::fs;
use std::io::Cursor;

use kbagent::cli::{run_command, run_shell, Command, Config, ListTarget};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("kbagent.json");
    let kb_path = dir.path().join("triage.json");
    fs::write(
        &config_path,
        format!(
            r#"{{"kb_path": {:?}, "max_iterations": 10, "explain_after_prove": true}}"#,
            kb_path.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    (dir, config)
}

fn run(config: &Config, command: Command) -> String {
    let mut out = Vec::new();
    run_command(config, command, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// =============================================================================
// Workflow Tests
// =============================================================================

/// Import, assert, prove and explain across separate invocations.
#[test]
fn test_one_shot_workflow() {
    let (dir, config) = setup();
    let rules = dir.path().join("rules.txt");
    fs::write(
        &rules,
        "SE Temperatura > 38 ENTÃO Febre = Sim\n\
         SE Febre = Sim E Tosse = Sim ENTÃO Suspeita = Gripe\n\
         SE Tosse\n",
    )
    .unwrap();

    let out = run(&config, Command::Import { file: rules });
    assert!(out.starts_with("[OK] 2 rule(s) imported."));
    assert!(out.contains("Line 3:"));

    run(&config, Command::AddFact { fact: vec!["Temperatura = 39".into()] });
    run(&config, Command::AddFact { fact: vec!["Tosse".into(), "=".into(), "Sim".into()] });

    let out = run(
        &config,
        Command::Prove { attr: "Suspeita".into(), value: "Gripe".into() },
    );
    assert!(out.starts_with("[OK] Proved Suspeita = Gripe"));

    // Persisted: a later invocation sees the proved facts.
    let out = run(&config, Command::List { target: ListTarget::Facts });
    assert!(out.contains("- Febre = Sim [base]"));
    assert!(out.contains("- Suspeita = Gripe [base]"));
}

/// The shell works on the configured file and writes it only on `save`.
#[test]
fn test_shell_saves_on_request() {
    let (_dir, config) = setup();
    run(&config, Command::AddRule { rule: vec!["SE A = 1 ENTÃO B = 2".into()] });
    let saved = fs::read_to_string(config.kb_path()).unwrap();

    let mut out = Vec::new();
    run_shell(&config, Cursor::new("af A = 1\nfw\nlf\n"), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("- B = 2 [forward(iteration=1)]"));
    assert_eq!(fs::read_to_string(config.kb_path()).unwrap(), saved);

    let mut out = Vec::new();
    run_shell(&config, Cursor::new("af A = 1\nsv\n"), &mut out).unwrap();
    let out = run(&config, Command::List { target: ListTarget::Facts });
    assert_eq!(out, "- A = 1 [base]\n");
}

/// A malformed rule fails with an input error code and prints nothing.
#[test]
fn test_invalid_rule_fails_with_code() {
    let (_dir, config) = setup();
    let mut out = Vec::new();
    let err = run_command(
        &config,
        Command::AddRule { rule: vec!["SE A = 1".into()] },
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.code_str(), "KB_CLI_INVALID_INPUT");
    assert!(out.is_empty());
}
