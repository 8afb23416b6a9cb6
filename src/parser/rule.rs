//! Rule and fact text parser
//!
//! ```text
//! rule      := "SE" cond ("E" cond)* then conclusion
//! then      := "ENTÃO" | "ENTAO" | "->" | "=>"
//! cond      := attr op value
//! op        := "=" | "==" | "é" | "eh" | "É" | "!=" | "≠"
//!            | "<" | "<=" | "≤" | ">" | ">=" | "≥" | "IN"
//! conclusion:= attr ("=" | "==" | "é" | "eh" | "É") value
//! ```
//!
//! Keywords are case-insensitive whole words and are only recognised
//! outside quoted tokens and bracketed lists.

use std::sync::OnceLock;

use regex::Regex;

use crate::knowledge::{Conclusion, Condition, Fact, Operator};
use crate::value::parse_value;

use super::errors::{ParseError, ParseResult};

const THEN_KEYWORDS: &[&str] = &["ENTÃO", "ENTAO", "->", "=>"];
const IF_KEYWORD: &[&str] = &["SE"];
const AND_KEYWORD: &[&str] = &["E"];

/// Longest operators first: the regex alternation is leftmost-first.
const CONDITION_PATTERN: &str =
    r"^\s*([\p{L}\p{N}_]+)\s*(==|!=|<=|>=|=|<|>|≤|≥|≠|(?i:in\b)|(?i:eh\b)|é|É)\s*(.+?)\s*$";
const FACT_PATTERN: &str = r"^\s*([\p{L}\p{N}_]+)\s*(==|=|(?i:eh\b)|é|É)\s*(.+?)\s*$";

/// Conditions and conclusion of a parsed rule, not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRule {
    pub conditions: Vec<Condition>,
    pub conclusion: Conclusion,
}

/// Compiled patterns for rule and fact text
#[derive(Debug)]
pub struct RuleParser {
    condition: Regex,
    fact: Regex,
}

static SHARED: OnceLock<ParseResult<RuleParser>> = OnceLock::new();

impl RuleParser {
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            condition: Regex::new(CONDITION_PATTERN)?,
            fact: Regex::new(FACT_PATTERN)?,
        })
    }

    /// Process-wide parser, compiled on first use
    pub fn shared() -> ParseResult<&'static RuleParser> {
        SHARED
            .get_or_init(RuleParser::new)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Parses `SE <cond> [E <cond>]* ENTÃO <attr> = <value>`
    pub fn parse_rule(&self, text: &str) -> ParseResult<ParsedRule> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let (lhs, rhs) = match find_keywords(text, THEN_KEYWORDS).as_slice() {
            [(start, end)] => (text[..*start].trim(), &text[*end..]),
            [] => return Err(ParseError::MissingThen),
            _ => return Err(ParseError::MultipleThen),
        };

        let body = match find_keywords(lhs, IF_KEYWORD).first() {
            Some(&(0, end)) => &lhs[end..],
            _ => return Err(ParseError::MissingIf),
        };

        let conditions = split_keywords(body, AND_KEYWORD)
            .into_iter()
            .map(|part| self.parse_condition(part))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(ParsedRule {
            conditions,
            conclusion: self.parse_conclusion(rhs)?,
        })
    }

    /// Parses a single `<attr> <op> <value>` condition
    pub fn parse_condition(&self, text: &str) -> ParseResult<Condition> {
        let invalid = || ParseError::InvalidCondition(text.trim().to_string());
        let caps = self.condition.captures(text).ok_or_else(invalid)?;
        let op = Operator::from_symbol(&caps[2]).ok_or_else(invalid)?;
        Ok(Condition::new(&caps[1], op, parse_value(&caps[3])))
    }

    /// Parses `Attr = Value` (equality operators only)
    pub fn parse_fact(&self, text: &str) -> ParseResult<Fact> {
        let caps = self
            .fact
            .captures(text)
            .ok_or_else(|| ParseError::InvalidFact(text.trim().to_string()))?;
        Ok(Fact::new(&caps[1], parse_value(&caps[3])))
    }

    fn parse_conclusion(&self, text: &str) -> ParseResult<Conclusion> {
        let caps = self
            .condition
            .captures(text)
            .ok_or_else(|| ParseError::InvalidConclusion(text.trim().to_string()))?;
        match Operator::from_symbol(&caps[2]) {
            Some(op) if op.is_equality() => Ok(Conclusion::new(&caps[1], parse_value(&caps[3]))),
            _ => Err(ParseError::NonEqualityConclusion(caps[2].to_string())),
        }
    }
}

/// Parses rule text with the shared parser
pub fn parse_rule(text: &str) -> ParseResult<ParsedRule> {
    RuleParser::shared()?.parse_rule(text)
}

/// Parses fact text with the shared parser
pub fn parse_fact(text: &str) -> ParseResult<Fact> {
    RuleParser::shared()?.parse_fact(text)
}

/// Splits `text` at every top-level keyword occurrence
fn split_keywords<'t>(text: &'t str, keywords: &[&str]) -> Vec<&'t str> {
    let mut parts = Vec::new();
    let mut from = 0;
    for (start, end) in find_keywords(text, keywords) {
        parts.push(&text[from..start]);
        from = end;
    }
    parts.push(&text[from..]);
    parts
}

/// Byte ranges of keyword occurrences outside quotes and brackets
fn find_keywords(text: &str, keywords: &[&str]) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut prev: Option<char> = None;
    let mut resume_at = 0;

    for (idx, ch) in text.char_indices() {
        if idx < resume_at {
            prev = Some(ch);
            continue;
        }

        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            prev = Some(ch);
            continue;
        }

        match ch {
            '\'' | '"' if !prev.is_some_and(is_word_char) => quote = Some(ch),
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if let Some(len) = keywords
                    .iter()
                    .find_map(|kw| match_keyword(&text[idx..], kw, prev))
                {
                    hits.push((idx, idx + len));
                    resume_at = idx + len;
                }
            }
            _ => {}
        }
        prev = Some(ch);
    }

    hits
}

/// Length in bytes of `kw` at the start of `rest`, compared
/// case-insensitively; word keywords must stand alone.
fn match_keyword(rest: &str, kw: &str, prev: Option<char>) -> Option<usize> {
    let word = kw.chars().all(char::is_alphabetic);
    if word && prev.is_some_and(is_word_char) {
        return None;
    }

    let mut chars = rest.chars();
    let mut len = 0;
    for k in kw.chars() {
        let c = chars.next()?;
        if !c.to_uppercase().eq(k.to_uppercase()) {
            return None;
        }
        len += c.len_utf8();
    }

    if word && chars.next().is_some_and(is_word_char) {
        return None;
    }
    Some(len)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_parse_simple_rule() {
        let rule = parse_rule("SE Temperatura > 38.0 ENTÃO Febre = Sim").unwrap();
        assert_eq!(
            rule.conditions,
            vec![Condition::new("Temperatura", Operator::Gt, 38.0)]
        );
        assert_eq!(rule.conclusion, Conclusion::new("Febre", "Sim"));
    }

    #[test]
    fn test_keywords_case_insensitive_and_synonyms() {
        let expected = parse_rule("SE A = 1 E B = 2 ENTÃO C = 3").unwrap();
        for text in [
            "se A = 1 e B = 2 então C = 3",
            "SE A = 1 E B = 2 ENTAO C = 3",
            "SE A = 1 E B = 2 -> C = 3",
            "SE A = 1 E B = 2 => C = 3",
        ] {
            assert_eq!(parse_rule(text).unwrap(), expected, "{}", text);
        }
        assert_eq!(expected.conditions.len(), 2);
    }

    #[test]
    fn test_operator_aliases() {
        let rule = parse_rule("SE A == x E B é y E C eh z E D ≥ 3 E Q ≠ w ENTÃO F é ok").unwrap();
        let ops: Vec<_> = rule.conditions.iter().map(|c| c.op).collect();
        assert_eq!(
            ops,
            vec![Operator::Eq, Operator::Eq, Operator::Eq, Operator::Ge, Operator::Ne]
        );
        assert_eq!(rule.conditions[4].attr, "Q");
        assert_eq!(rule.conclusion, Conclusion::new("F", "ok"));
    }

    #[test]
    fn test_longest_operator_wins() {
        let rule = parse_rule("SE Idade <= 12 E Peso >= 40 E Nota != 0 ENTÃO Grupo = A").unwrap();
        let ops: Vec<_> = rule.conditions.iter().map(|c| c.op).collect();
        assert_eq!(ops, vec![Operator::Le, Operator::Ge, Operator::Ne]);
        assert_eq!(rule.conditions[0].value, Value::number(12.0));
    }

    #[test]
    fn test_membership_list() {
        let rule = parse_rule("SE Risco IN [Alto, Medio] ENTÃO Alerta = true").unwrap();
        assert_eq!(rule.conditions[0].op, Operator::In);
        assert_eq!(
            rule.conditions[0].value,
            Value::list(vec![Value::text("Alto"), Value::text("Medio")])
        );
        assert_eq!(rule.conclusion.value, Value::Boolean(true));

        let lower = parse_rule("SE Risco in [\"Alto\"] ENTÃO Alerta = 1").unwrap();
        assert_eq!(lower.conditions[0].op, Operator::In);
    }

    #[test]
    fn test_keywords_inside_quotes_and_lists_are_literal() {
        let rule = parse_rule("SE Nome = 'A E B' E Cor IN [\"x -> y\", z] ENTÃO Ok = 'SE ENTÃO'").unwrap();
        assert_eq!(rule.conditions[0].value, Value::text("A E B"));
        assert_eq!(
            rule.conditions[1].value,
            Value::list(vec![Value::text("x -> y"), Value::text("z")])
        );
        assert_eq!(rule.conclusion.value, Value::text("SE ENTÃO"));
    }

    #[test]
    fn test_words_containing_keywords() {
        let rule = parse_rule("SE Estado = Entrada E Sensor = Leve ENTÃO Setor = Leste").unwrap();
        assert_eq!(rule.conditions.len(), 2);
        assert_eq!(rule.conditions[0], Condition::eq("Estado", "Entrada"));
        assert_eq!(rule.conclusion, Conclusion::new("Setor", "Leste"));
    }

    #[test]
    fn test_malformed_rules() {
        assert_eq!(parse_rule("   "), Err(ParseError::Empty));
        assert_eq!(parse_rule("SE A = 1"), Err(ParseError::MissingThen));
        assert_eq!(
            parse_rule("SE A = 1 ENTÃO B = 2 ENTÃO C = 3"),
            Err(ParseError::MultipleThen)
        );
        assert_eq!(parse_rule("A = 1 ENTÃO B = 2"), Err(ParseError::MissingIf));
        assert_eq!(parse_rule("SETOR = 1 ENTÃO B = 2"), Err(ParseError::MissingIf));
        assert_eq!(
            parse_rule("SE A ~ 1 ENTÃO B = 2"),
            Err(ParseError::InvalidCondition("A ~ 1".into()))
        );
        assert_eq!(
            parse_rule("SE ENTÃO B = 2"),
            Err(ParseError::InvalidCondition(String::new()))
        );
        assert_eq!(
            parse_rule("SE A = 1 ENTÃO B > 2"),
            Err(ParseError::NonEqualityConclusion(">".into()))
        );
        assert!(matches!(
            parse_rule("SE A = 1 ENTÃO B"),
            Err(ParseError::InvalidConclusion(_))
        ));
    }

    #[test]
    fn test_parse_fact() {
        assert_eq!(parse_fact("Temperatura = 39.2").unwrap(), Fact::new("Temperatura", 39.2));
        assert_eq!(parse_fact("Febre é 'Sim'").unwrap(), Fact::new("Febre", "Sim"));
        assert_eq!(
            parse_fact("Sintomas = [tosse, febre]").unwrap().value,
            Value::list(vec![Value::text("tosse"), Value::text("febre")])
        );
        assert!(matches!(parse_fact("Temperatura > 3"), Err(ParseError::InvalidFact(_))));
        assert!(parse_fact("= 3").is_err());
    }

    #[test]
    fn test_canonical_text_reparses() {
        let parsed = parse_rule("se Nome = 'João Silva' e Idade >= 18 e Tipo in [a, 2] -> Cliente = \"1\"").unwrap();
        let rule = crate::knowledge::Rule {
            id: 1,
            conditions: parsed.conditions.clone(),
            conclusion: parsed.conclusion.clone(),
            text: String::new(),
        };
        let again = parse_rule(&rule.canonical_text()).unwrap();
        assert_eq!(again, parsed);
        assert_eq!(parsed.conclusion.value, Value::text("1"));
    }

    #[test]
    fn test_canonical_text_quotes_keywords_and_brackets() {
        for raw in ["E", "e", "ENTÃO", "entao", "SE", "[x", "x]", "'x", "a\"b", "it's"] {
            let value = Value::text(raw);
            let rule = crate::knowledge::Rule {
                id: 1,
                conditions: vec![Condition::eq("A", value.clone())],
                conclusion: Conclusion::new("B", value.clone()),
                text: String::new(),
            };
            let again = parse_rule(&rule.canonical_text())
                .unwrap_or_else(|e| panic!("{:?}: {}", raw, e));
            assert_eq!(again.conditions, rule.conditions, "{:?}", raw);
            assert_eq!(again.conclusion, rule.conclusion, "{:?}", raw);
        }
    }
}
