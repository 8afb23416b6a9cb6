//! Knowledge data model: facts, conditions, conclusions, rules and justifications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{render_token, Value};

/// Rule identifier. Assigned by the store, positive, never reused.
pub type RuleId = u64;

/// Condition operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// attr = value
    #[serde(rename = "=", alias = "==", alias = "é", alias = "eh", alias = "É")]
    Eq,
    /// attr != value
    #[serde(rename = "!=", alias = "≠")]
    Ne,
    /// attr < value (numeric)
    #[serde(rename = "<")]
    Lt,
    /// attr <= value (numeric)
    #[serde(rename = "<=", alias = "≤")]
    Le,
    /// attr > value (numeric)
    #[serde(rename = ">")]
    Gt,
    /// attr >= value (numeric)
    #[serde(rename = ">=", alias = "≥")]
    Ge,
    /// attr IN [values]
    #[serde(rename = "IN", alias = "in")]
    In,
}

impl Operator {
    /// Canonical symbol used in rule text and persistence
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::In => "IN",
        }
    }

    /// Resolves a symbol or one of its aliases
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "=" | "==" | "é" | "eh" | "É" => Some(Operator::Eq),
            "!=" | "≠" => Some(Operator::Ne),
            "<" => Some(Operator::Lt),
            "<=" | "≤" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            ">=" | "≥" => Some(Operator::Ge),
            s if s.eq_ignore_ascii_case("in") => Some(Operator::In),
            s if s.eq_ignore_ascii_case("eh") => Some(Operator::Eq),
            _ => None,
        }
    }

    /// Equality is the only operator backward chaining can prove
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Eq)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A single attribute's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub attr: String,
    pub value: Value,
}

impl Fact {
    pub fn new(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attr: attr.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.attr, self.value)
    }
}

/// A per-attribute test against the current fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub attr: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(attr: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            attr: attr.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality condition
    pub fn eq(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(attr, Operator::Eq, value)
    }

    fn canonical_text(&self) -> String {
        format!("{} {} {}", self.attr, self.op, render_token(&self.value))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attr, self.op, self.value)
    }
}

/// The equality fact a rule asserts when all its conditions hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConclusionRepr", into = "ConclusionRepr")]
pub struct Conclusion {
    pub attr: String,
    pub value: Value,
}

impl Conclusion {
    pub fn new(attr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attr: attr.into(),
            value: value.into(),
        }
    }

    /// Returns true if this conclusion asserts exactly `attr = value`
    pub fn matches(&self, attr: &str, value: &Value) -> bool {
        self.attr == attr && &self.value == value
    }

    pub fn to_fact(&self) -> Fact {
        Fact::new(self.attr.clone(), self.value.clone())
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.attr, self.value)
    }
}

/// Persisted shape of a conclusion: `{"attr", "op": "=", "value"}`
#[derive(Serialize, Deserialize)]
struct ConclusionRepr {
    attr: String,
    #[serde(default)]
    op: Option<Operator>,
    value: Value,
}

impl TryFrom<ConclusionRepr> for Conclusion {
    type Error = String;

    fn try_from(repr: ConclusionRepr) -> Result<Self, Self::Error> {
        match repr.op {
            None | Some(Operator::Eq) => Ok(Conclusion::new(repr.attr, repr.value)),
            Some(op) => Err(format!(
                "conclusion for '{}' must use '=', found '{}'",
                repr.attr, op
            )),
        }
    }
}

impl From<Conclusion> for ConclusionRepr {
    fn from(c: Conclusion) -> Self {
        Self {
            attr: c.attr,
            op: Some(Operator::Eq),
            value: c.value,
        }
    }
}

/// A conjunction of conditions plus one conclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub conditions: Vec<Condition>,
    pub conclusion: Conclusion,
    /// Source text as written by the user, kept for display
    #[serde(default)]
    pub text: String,
}

impl Rule {
    /// Returns true if this rule concludes exactly `attr = value`
    pub fn concludes(&self, attr: &str, value: &Value) -> bool {
        self.conclusion.matches(attr, value)
    }

    /// Renders the rule in the `SE ... ENTÃO ...` form.
    ///
    /// Parsing the result yields the same conditions and conclusion.
    pub fn canonical_text(&self) -> String {
        let lhs = self
            .conditions
            .iter()
            .map(Condition::canonical_text)
            .collect::<Vec<_>>()
            .join(" E ");
        format!(
            "SE {} ENTÃO {} = {}",
            lhs,
            self.conclusion.attr,
            render_token(&self.conclusion.value)
        )
    }

    /// Source text when present, canonical text otherwise
    pub fn display_text(&self) -> String {
        if self.text.trim().is_empty() {
            self.canonical_text()
        } else {
            self.text.clone()
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lhs = self
            .conditions
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" E ");
        write!(f, "Rule #{}: SE {} ENTÃO {}", self.id, lhs, self.conclusion)
    }
}

/// How a fact came to be known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Asserted directly by the caller
    Base,
    /// Asserted during forward-chaining round `iteration` (1-based)
    Forward { iteration: usize },
    /// Asserted while proving a goal
    Backward,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Base => write!(f, "base"),
            Provenance::Forward { iteration } => write!(f, "forward(iteration={})", iteration),
            Provenance::Backward => write!(f, "backward"),
        }
    }
}

/// Provenance record for an attribute's current fact
#[derive(Debug, Clone, PartialEq)]
pub struct Justification {
    /// Rule that derived the fact, `None` when asserted directly
    pub rule_id: Option<RuleId>,
    /// Facts actually used to satisfy the rule, in condition order
    pub premises: Vec<Fact>,
    pub provenance: Provenance,
}

impl Justification {
    /// Justification for a directly asserted fact
    pub fn base() -> Self {
        Self {
            rule_id: None,
            premises: Vec::new(),
            provenance: Provenance::Base,
        }
    }

    /// Justification for a rule-derived fact
    pub fn derived(rule_id: RuleId, premises: Vec<Fact>, provenance: Provenance) -> Self {
        Self {
            rule_id: Some(rule_id),
            premises,
            provenance,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.rule_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fever_rule() -> Rule {
        Rule {
            id: 1,
            conditions: vec![Condition::new("Temperatura", Operator::Gt, 38.0)],
            conclusion: Conclusion::new("Febre", "Sim"),
            text: String::new(),
        }
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!(Operator::from_symbol("=="), Some(Operator::Eq));
        assert_eq!(Operator::from_symbol("é"), Some(Operator::Eq));
        assert_eq!(Operator::from_symbol("EH"), Some(Operator::Eq));
        assert_eq!(Operator::from_symbol("≥"), Some(Operator::Ge));
        assert_eq!(Operator::from_symbol("in"), Some(Operator::In));
        assert_eq!(Operator::from_symbol("~"), None);
    }

    #[test]
    fn test_condition_json_shape() {
        let c = Condition::new("Temperatura", Operator::Ge, 38.5);
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            json!({"attr": "Temperatura", "op": ">=", "value": 38.5})
        );
        let back: Condition =
            serde_json::from_value(json!({"attr": "Cor", "op": "≠", "value": "azul"})).unwrap();
        assert_eq!(back, Condition::new("Cor", Operator::Ne, "azul"));
    }

    #[test]
    fn test_conclusion_requires_equality() {
        let ok: Conclusion =
            serde_json::from_value(json!({"attr": "Febre", "op": "=", "value": "Sim"})).unwrap();
        assert_eq!(ok, Conclusion::new("Febre", "Sim"));

        let implicit: Conclusion =
            serde_json::from_value(json!({"attr": "Febre", "value": "Sim"})).unwrap();
        assert_eq!(implicit, ok);

        let bad: Result<Conclusion, _> =
            serde_json::from_value(json!({"attr": "Febre", "op": ">", "value": 1}));
        assert!(bad.is_err());

        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"attr": "Febre", "op": "=", "value": "Sim"})
        );
    }

    #[test]
    fn test_canonical_text() {
        let rule = fever_rule();
        assert_eq!(rule.canonical_text(), "SE Temperatura > 38 ENTÃO Febre = Sim");
        assert_eq!(rule.display_text(), rule.canonical_text());
    }

    #[test]
    fn test_provenance_tags() {
        assert_eq!(Provenance::Base.to_string(), "base");
        assert_eq!(
            Provenance::Forward { iteration: 3 }.to_string(),
            "forward(iteration=3)"
        );
        assert_eq!(Provenance::Backward.to_string(), "backward");
    }
}
