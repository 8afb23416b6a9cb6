//! Attribute catalogs derived from the rule set
//!
//! Never edited directly: rebuilt from the rules after every rule change,
//! so it cannot drift from the rules actually stored.

use std::collections::BTreeSet;

use super::types::Rule;

/// Attribute names mentioned by the current rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeCatalog {
    all: BTreeSet<String>,
    conditions: BTreeSet<String>,
    conclusions: BTreeSet<String>,
}

impl AttributeCatalog {
    /// Builds the catalog for a rule set
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let mut catalog = Self::default();
        for rule in rules {
            catalog.record(rule);
        }
        catalog
    }

    /// Adds the attributes of one rule
    pub(crate) fn record(&mut self, rule: &Rule) {
        for cond in &rule.conditions {
            let attr = cond.attr.trim();
            if !attr.is_empty() {
                self.all.insert(attr.to_string());
                self.conditions.insert(attr.to_string());
            }
        }
        let attr = rule.conclusion.attr.trim();
        if !attr.is_empty() {
            self.all.insert(attr.to_string());
            self.conclusions.insert(attr.to_string());
        }
    }

    /// Every attribute mentioned anywhere, sorted
    pub fn all(&self) -> Vec<&str> {
        self.all.iter().map(String::as_str).collect()
    }

    /// Attributes used in rule conditions (fact-eligible), sorted
    pub fn condition_attributes(&self) -> Vec<&str> {
        self.conditions.iter().map(String::as_str).collect()
    }

    /// Attributes used in rule conclusions (goal-eligible), sorted
    pub fn conclusion_attributes(&self) -> Vec<&str> {
        self.conclusions.iter().map(String::as_str).collect()
    }

    pub fn is_condition_attribute(&self, attr: &str) -> bool {
        self.conditions.contains(attr)
    }

    pub fn is_conclusion_attribute(&self, attr: &str) -> bool {
        self.conclusions.contains(attr)
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::types::{Conclusion, Condition, Operator};

    fn rule(id: u64, conds: &[&str], concl: &str) -> Rule {
        Rule {
            id,
            conditions: conds
                .iter()
                .map(|a| Condition::new(*a, Operator::Eq, "x"))
                .collect(),
            conclusion: Conclusion::new(concl, "y"),
            text: String::new(),
        }
    }

    #[test]
    fn test_catalog_split() {
        let rules = vec![rule(1, &["A", "B"], "C"), rule(2, &["C"], "D")];
        let catalog = AttributeCatalog::from_rules(&rules);

        assert_eq!(catalog.all(), vec!["A", "B", "C", "D"]);
        assert_eq!(catalog.condition_attributes(), vec!["A", "B", "C"]);
        assert_eq!(catalog.conclusion_attributes(), vec!["C", "D"]);
        assert!(catalog.is_condition_attribute("C"));
        assert!(catalog.is_conclusion_attribute("C"));
        assert!(!catalog.is_conclusion_attribute("A"));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = AttributeCatalog::from_rules(&Vec::<Rule>::new());
        assert!(catalog.is_empty());
        assert!(catalog.all().is_empty());
    }
}
