//! The knowledge store
//!
//! Sole owner of facts, rules and justifications. Engines borrow it and
//! mutate it only through the methods here, which keep two invariants:
//!
//! - facts and justifications are keyed identically
//! - the attribute catalog always equals the attributes of the current rules

use std::collections::BTreeMap;

use tracing::debug;

use crate::value::Value;

use super::catalog::AttributeCatalog;
use super::errors::{KnowledgeError, KnowledgeResult};
use super::types::{Conclusion, Condition, Fact, Justification, Rule, RuleId};

/// Default number of example values offered per attribute
pub const DEFAULT_EXAMPLE_VALUES: usize = 5;

/// Facts, rules and provenance for one knowledge base
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    /// attribute -> current value
    facts: BTreeMap<String, Value>,
    /// attribute -> provenance of the current value
    justifications: BTreeMap<String, Justification>,
    /// Insertion order is evaluation order
    rules: Vec<Rule>,
    next_rule_id: RuleId,
    catalog: AttributeCatalog,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    /// Creates an empty knowledge base
    pub fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
            justifications: BTreeMap::new(),
            rules: Vec::new(),
            next_rule_id: 1,
            catalog: AttributeCatalog::default(),
        }
    }

    // ----- facts -----

    /// Asserts a fact directly (provenance `base`).
    ///
    /// Overwrites any current value and justification for the attribute.
    pub fn add_fact(&mut self, attr: impl Into<String>, value: impl Into<Value>) -> KnowledgeResult<()> {
        let attr = normalize_attr(attr.into())?;
        self.put_fact(attr, value.into(), Justification::base());
        Ok(())
    }

    /// Asserts a derived fact with its justification.
    pub(crate) fn assert_derived(&mut self, attr: &str, value: Value, justification: Justification) {
        self.put_fact(attr.to_string(), value, justification);
    }

    fn put_fact(&mut self, attr: String, value: Value, justification: Justification) {
        debug!(
            attr = %attr,
            value = %value,
            provenance = %justification.provenance,
            "fact asserted"
        );
        self.justifications.insert(attr.clone(), justification);
        self.facts.insert(attr, value);
    }

    /// Removes a fact and its justification. Returns the removed value.
    pub fn remove_fact(&mut self, attr: &str) -> Option<Value> {
        self.justifications.remove(attr);
        self.facts.remove(attr)
    }

    /// Current value of an attribute
    pub fn fact(&self, attr: &str) -> Option<&Value> {
        self.facts.get(attr)
    }

    /// Returns true if the attribute has a current fact
    pub fn contains(&self, attr: &str) -> bool {
        self.facts.contains_key(attr)
    }

    /// Returns true if `attr = value` is currently known
    pub fn has_fact(&self, attr: &str, value: &Value) -> bool {
        self.facts.get(attr) == Some(value)
    }

    /// All current facts, sorted by attribute
    pub fn facts(&self) -> Vec<Fact> {
        self.facts
            .iter()
            .map(|(attr, value)| Fact::new(attr.clone(), value.clone()))
            .collect()
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Provenance of the attribute's current fact
    pub fn justification(&self, attr: &str) -> Option<&Justification> {
        self.justifications.get(attr)
    }

    /// All justifications, keyed by attribute
    pub fn justifications(&self) -> impl Iterator<Item = (&str, &Justification)> {
        self.justifications.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ----- rules -----

    /// Adds a rule and returns its newly assigned id.
    ///
    /// Nothing is stored when the rule is malformed.
    pub fn add_rule(
        &mut self,
        conditions: Vec<Condition>,
        conclusion: Conclusion,
        text: impl Into<String>,
    ) -> KnowledgeResult<RuleId> {
        let (conditions, conclusion) = validate_rule(conditions, conclusion)?;

        let id = self.next_rule_id;
        self.next_rule_id += 1;

        let rule = Rule {
            id,
            conditions,
            conclusion,
            text: text.into().trim().to_string(),
        };
        self.catalog.record(&rule);
        debug!(rule_id = id, rule = %rule.display_text(), "rule added");
        self.rules.push(rule);

        Ok(id)
    }

    /// Removes a rule by id. Returns false when no such rule exists.
    ///
    /// Ids of the remaining rules are untouched and the removed id is never
    /// handed out again.
    pub fn remove_rule(&mut self, id: RuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        if self.rules.len() == before {
            return false;
        }
        self.rebuild_catalog();
        debug!(rule_id = id, "rule removed");
        true
    }

    /// Rules in insertion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Id the next added rule will receive
    pub fn next_rule_id(&self) -> RuleId {
        self.next_rule_id
    }

    /// Rules concluding exactly `attr = value`, in insertion order
    pub fn rules_concluding<'a>(&'a self, attr: &'a str, value: &'a Value) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.concludes(attr, value))
    }

    // ----- catalogs -----

    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    /// Every attribute mentioned by a rule, sorted
    pub fn attributes(&self) -> Vec<&str> {
        self.catalog.all()
    }

    /// Attributes appearing in rule conditions, sorted
    pub fn fact_attributes(&self) -> Vec<&str> {
        self.catalog.condition_attributes()
    }

    /// Attributes appearing in rule conclusions, sorted
    pub fn goal_attributes(&self) -> Vec<&str> {
        self.catalog.conclusion_attributes()
    }

    /// Distinct condition operands used for `attr`, in rule order
    pub fn example_values(&self, attr: &str, max: usize) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for cond in self.rules.iter().flat_map(|r| r.conditions.iter()) {
            if seen.len() >= max {
                break;
            }
            if cond.attr == attr && !seen.contains(&cond.value) {
                seen.push(cond.value.clone());
            }
        }
        seen
    }

    /// Distinct conclusion values for `attr`, in rule order
    pub fn goal_values(&self, attr: &str, max: Option<usize>) -> Vec<Value> {
        let mut seen: Vec<Value> = Vec::new();
        for rule in &self.rules {
            if max.is_some_and(|m| seen.len() >= m) {
                break;
            }
            if rule.conclusion.attr == attr && !seen.contains(&rule.conclusion.value) {
                seen.push(rule.conclusion.value.clone());
            }
        }
        seen
    }

    fn rebuild_catalog(&mut self) {
        self.catalog = AttributeCatalog::from_rules(&self.rules);
    }

    // ----- whole-state replacement -----

    /// Builds a store from already-validated parts.
    pub(crate) fn from_parts(
        facts: Vec<Fact>,
        rules: Vec<Rule>,
        next_rule_id: RuleId,
    ) -> Self {
        let mut kb = Self::new();
        for fact in facts {
            kb.put_fact(fact.attr, fact.value, Justification::base());
        }
        kb.rules = rules;
        kb.next_rule_id = next_rule_id;
        kb.rebuild_catalog();
        kb
    }

    /// Replaces the whole state in one assignment.
    pub(crate) fn replace(&mut self, other: KnowledgeBase) {
        *self = other;
    }
}

/// Trims and checks an attribute name
pub(crate) fn normalize_attr(attr: String) -> KnowledgeResult<String> {
    let trimmed = attr.trim();
    if trimmed.is_empty() {
        return Err(KnowledgeError::EmptyAttribute);
    }
    if trimmed.len() == attr.len() {
        Ok(attr)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Checks a rule's structure and normalizes its attribute names
pub(crate) fn validate_rule(
    conditions: Vec<Condition>,
    conclusion: Conclusion,
) -> KnowledgeResult<(Vec<Condition>, Conclusion)> {
    if conditions.is_empty() {
        return Err(KnowledgeError::NoConditions);
    }
    let conditions = conditions
        .into_iter()
        .map(|c| {
            Ok(Condition {
                attr: normalize_attr(c.attr)?,
                ..c
            })
        })
        .collect::<KnowledgeResult<Vec<_>>>()?;
    let conclusion = Conclusion {
        attr: normalize_attr(conclusion.attr)?,
        value: conclusion.value,
    };
    Ok((conditions, conclusion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::{Operator, Provenance};

    fn fever_kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(
            vec![Condition::new("Temperatura", Operator::Gt, 38.0)],
            Conclusion::new("Febre", "Sim"),
            "SE Temperatura > 38.0 ENTÃO Febre = Sim",
        )
        .unwrap();
        kb.add_rule(
            vec![Condition::eq("Febre", "Sim")],
            Conclusion::new("Risco", "Alto"),
            "SE Febre = Sim ENTÃO Risco = Alto",
        )
        .unwrap();
        kb
    }

    #[test]
    fn test_add_fact_overwrites_value_and_justification() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact("Febre", "Sim").unwrap();
        kb.assert_derived(
            "Febre",
            Value::text("Nao"),
            Justification::derived(1, vec![], Provenance::Backward),
        );
        assert_eq!(kb.fact("Febre"), Some(&Value::text("Nao")));
        assert_eq!(kb.justification("Febre").unwrap().rule_id, Some(1));

        kb.add_fact("Febre", "Sim").unwrap();
        assert_eq!(kb.fact_count(), 1);
        assert_eq!(kb.justification("Febre"), Some(&Justification::base()));
    }

    #[test]
    fn test_empty_attribute_rejected() {
        let mut kb = KnowledgeBase::new();
        assert_eq!(kb.add_fact("  ", 1.0), Err(KnowledgeError::EmptyAttribute));
        assert_eq!(kb.fact_count(), 0);
    }

    #[test]
    fn test_attribute_is_trimmed() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(" Temperatura ", 39.2).unwrap();
        assert!(kb.contains("Temperatura"));
    }

    #[test]
    fn test_remove_fact_removes_justification() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact("A", 1.0).unwrap();
        assert_eq!(kb.remove_fact("A"), Some(Value::number(1.0)));
        assert!(kb.justification("A").is_none());
        assert_eq!(kb.remove_fact("A"), None);
    }

    #[test]
    fn test_rule_ids_monotonic_across_removal() {
        let mut kb = fever_kb();
        assert!(kb.remove_rule(2));
        let id = kb
            .add_rule(
                vec![Condition::eq("X", 1.0)],
                Conclusion::new("Y", 2.0),
                "",
            )
            .unwrap();
        assert_eq!(id, 3);
        assert_eq!(kb.rules().iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_remove_unknown_rule() {
        let mut kb = fever_kb();
        assert!(!kb.remove_rule(42));
        assert_eq!(kb.rule_count(), 2);
    }

    #[test]
    fn test_rule_without_conditions_rejected() {
        let mut kb = KnowledgeBase::new();
        let err = kb
            .add_rule(vec![], Conclusion::new("Y", 1.0), "")
            .unwrap_err();
        assert_eq!(err, KnowledgeError::NoConditions);
        assert_eq!(kb.next_rule_id(), 1);
    }

    #[test]
    fn test_catalog_follows_rules() {
        let mut kb = fever_kb();
        assert_eq!(kb.attributes(), vec!["Febre", "Risco", "Temperatura"]);
        assert_eq!(kb.fact_attributes(), vec!["Febre", "Temperatura"]);
        assert_eq!(kb.goal_attributes(), vec!["Febre", "Risco"]);

        kb.remove_rule(1);
        assert_eq!(kb.attributes(), vec!["Febre", "Risco"]);
        assert_eq!(kb.fact_attributes(), vec!["Febre"]);
        assert_eq!(kb.goal_attributes(), vec!["Risco"]);
    }

    #[test]
    fn test_example_and_goal_values() {
        let mut kb = fever_kb();
        kb.add_rule(
            vec![Condition::new("Temperatura", Operator::Lt, 36.0)],
            Conclusion::new("Febre", "Nao"),
            "",
        )
        .unwrap();
        kb.add_rule(
            vec![Condition::new("Temperatura", Operator::Gt, 38.0)],
            Conclusion::new("Febre", "Sim"),
            "",
        )
        .unwrap();

        assert_eq!(
            kb.example_values("Temperatura", DEFAULT_EXAMPLE_VALUES),
            vec![Value::number(38.0), Value::number(36.0)]
        );
        assert_eq!(kb.example_values("Temperatura", 1), vec![Value::number(38.0)]);
        assert_eq!(
            kb.goal_values("Febre", None),
            vec![Value::text("Sim"), Value::text("Nao")]
        );
        assert_eq!(kb.goal_values("Febre", Some(1)), vec![Value::text("Sim")]);
        assert!(kb.goal_values("Temperatura", None).is_empty());
    }

    #[test]
    fn test_rules_concluding_in_order() {
        let mut kb = fever_kb();
        kb.add_rule(
            vec![Condition::eq("Tosse", "Sim")],
            Conclusion::new("Risco", "Alto"),
            "",
        )
        .unwrap();
        let risk = Value::text("Alto");
        let ids: Vec<_> = kb.rules_concluding("Risco", &risk).map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
