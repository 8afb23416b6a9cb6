//! Flat persisted form of a knowledge base
//!
//! ```json
//! {
//!   "facts": [{"attr": "Temperatura", "value": 39.2}],
//!   "rules": [{"id": 1, "conditions": [...], "conclusion": {...}, "text": "SE ..."}],
//!   "next_rule_id": 2
//! }
//! ```
//!
//! Justifications are not persisted: every loaded fact is `base`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::errors::{KnowledgeError, KnowledgeResult};
use super::store::{normalize_attr, validate_rule, KnowledgeBase};
use super::types::{Fact, Rule, RuleId};

/// Serializable knowledge base contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default)]
    pub facts: Vec<Fact>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Keeps rule ids monotonic across save/load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_rule_id: Option<RuleId>,
}

impl KnowledgeDocument {
    /// Parses a document from JSON text
    pub fn from_json(json: &str) -> KnowledgeResult<Self> {
        serde_json::from_str(json).map_err(|e| KnowledgeError::InvalidDocument(e.to_string()))
    }

    /// Renders the document as pretty JSON
    pub fn to_json_pretty(&self) -> KnowledgeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| KnowledgeError::InvalidDocument(e.to_string()))
    }
}

impl KnowledgeBase {
    /// Serializes facts and rules into a document
    pub fn to_document(&self) -> KnowledgeDocument {
        KnowledgeDocument {
            facts: self.facts(),
            rules: self.rules().to_vec(),
            next_rule_id: Some(self.next_rule_id()),
        }
    }

    /// Builds a new store from a document
    pub fn from_document(doc: KnowledgeDocument) -> KnowledgeResult<Self> {
        let mut seen: HashSet<RuleId> = HashSet::new();
        let mut max_id: RuleId = 0;
        let mut rules = Vec::with_capacity(doc.rules.len());

        for rule in doc.rules {
            if rule.id == 0 {
                return Err(KnowledgeError::InvalidRuleId(rule.id));
            }
            if !seen.insert(rule.id) {
                return Err(KnowledgeError::DuplicateRuleId(rule.id));
            }
            max_id = max_id.max(rule.id);
            let (conditions, conclusion) = validate_rule(rule.conditions, rule.conclusion)?;
            rules.push(Rule {
                id: rule.id,
                conditions,
                conclusion,
                text: rule.text,
            });
        }

        let facts = doc
            .facts
            .into_iter()
            .map(|f| Ok(Fact::new(normalize_attr(f.attr)?, f.value)))
            .collect::<KnowledgeResult<Vec<_>>>()?;

        let next_rule_id = doc.next_rule_id.unwrap_or(1).max(max_id + 1);
        Ok(KnowledgeBase::from_parts(facts, rules, next_rule_id))
    }

    /// Replaces the entire store with the document's contents.
    ///
    /// On error the store is left untouched.
    pub fn load_document(&mut self, doc: KnowledgeDocument) -> KnowledgeResult<()> {
        let loaded = KnowledgeBase::from_document(doc)?;
        info!(
            facts = loaded.fact_count(),
            rules = loaded.rule_count(),
            "knowledge base loaded"
        );
        self.replace(loaded);
        Ok(())
    }
}
