//! Rule Text Tests
//!
//! Tests for the `SE ... ENTÃO ...` surface syntax:
//! - Keyword and operator synonyms
//! - Value tokens (numbers, quoted text, booleans, lists)
//! - Line-based import with per-line issues

use kbagent::knowledge::{KnowledgeBase, Operator};
use kbagent::parser::{import_rules, parse_fact, parse_rule};
use kbagent::value::Value;

// =============================================================================
// Parsing Tests
// =============================================================================

/// Every `then` spelling yields the same rule.
#[test]
fn test_then_synonyms_agree() {
    let expected = parse_rule("SE Temperatura > 38 ENTÃO Febre = Sim").unwrap();
    for text in [
        "se Temperatura > 38 entao Febre = Sim",
        "SE Temperatura > 38 -> Febre = Sim",
        "SE Temperatura > 38 => Febre = Sim",
    ] {
        assert_eq!(parse_rule(text).unwrap(), expected, "{}", text);
    }
}

/// Conditions keep source order and operator aliases normalise.
#[test]
fn test_conditions_and_aliases() {
    let rule = parse_rule(
        "SE Idade ≥ 65 E Sexo é F E Estado IN [grave, 'muito grave'] ENTÃO Prioridade = 1",
    )
    .unwrap();

    let ops: Vec<Operator> = rule.conditions.iter().map(|c| c.op).collect();
    assert_eq!(ops, vec![Operator::Ge, Operator::Eq, Operator::In]);
    assert_eq!(rule.conditions[0].value, Value::Number(65.0));
    assert_eq!(rule.conditions[1].value, Value::text("F"));
    assert_eq!(
        rule.conditions[2].value,
        Value::list([Value::text("grave"), Value::text("muito grave")])
    );
    assert_eq!(rule.conclusion.value, Value::Number(1.0));
}

/// Quoted text keeps keywords and spaces intact.
#[test]
fn test_quoted_values() {
    let rule = parse_rule("SE Nota = \"Se E Então\" ENTÃO Status = 'ok ok'").unwrap();
    assert_eq!(rule.conditions.len(), 1);
    assert_eq!(rule.conditions[0].value, Value::text("Se E Então"));
    assert_eq!(rule.conclusion.value, Value::text("ok ok"));
}

/// Facts accept the equality spellings only.
#[test]
fn test_parse_fact() {
    let fact = parse_fact("Temperatura = 39.2").unwrap();
    assert_eq!(fact.attr, "Temperatura");
    assert_eq!(fact.value, Value::Number(39.2));

    assert_eq!(parse_fact("Ativo é true").unwrap().value, Value::Boolean(true));
    assert!(parse_fact("Temperatura > 39").is_err());
}

// =============================================================================
// Import Tests
// =============================================================================

/// Good lines are added in order; bad ones are reported with their line.
#[test]
fn test_import_report() {
    let mut kb = KnowledgeBase::new();
    let report = import_rules(
        &mut kb,
        "# comentario\n\
         SE Temperatura > 38 ENTÃO Febre = Sim;\n\
         \n\
         SE Febre ENTÃO Risco = Alto\n\
         // outro\n\
         SE Febre = Sim ENTÃO Risco = Alto\n",
    );

    assert_eq!(report.added, vec![1, 2]);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].line, 4);
    assert!(report.issues[0]
        .to_string()
        .starts_with("Line 4: Could not understand condition"));
    assert_eq!(kb.rule(1).unwrap().text, "SE Temperatura > 38 ENTÃO Febre = Sim");
}
