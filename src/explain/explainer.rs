//! `why` and `how` traversals over the justification graph
//!
//! Both are read-only. Overwritten facts can leave justifications that
//! point back at their own attribute, so every traversal tracks the
//! attributes on the current branch and stops with a `Cycle` node.

use tracing::debug;

use crate::knowledge::{Fact, Justification, KnowledgeBase};
use crate::observability::Event;
use crate::value::Value;

use super::node::{Explanation, ExplanationNode};

/// Builds explanations against a borrowed store
pub struct Explainer<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> Explainer<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Immediate cause of `attr = value`.
    ///
    /// Cites the asserting rule, then unwinds rule-derived premises with
    /// [`how`](Self::how) semantics and lists the rest as known premises.
    pub fn why(&self, attr: &str, value: &Value) -> Explanation {
        let fact = Fact::new(attr, value.clone());
        let root = match self.lookup(&fact) {
            Lookup::Missing => ExplanationNode::NotEstablished { fact },
            Lookup::NoJustification => ExplanationNode::NoProvenance { fact },
            Lookup::Found(j) if !j.is_derived() => ExplanationNode::Given {
                fact,
                provenance: j.provenance,
            },
            Lookup::Found(j) => {
                let mut branch = vec![fact.attr.clone()];
                let premises = j
                    .premises
                    .iter()
                    .map(|p| match self.kb.justification(&p.attr) {
                        Some(pj) if pj.is_derived() => self.how_node(self.current_or(p), &mut branch),
                        _ => ExplanationNode::KnownPremise { fact: p.clone() },
                    })
                    .collect();
                self.derived(fact, j, premises)
            }
        };

        let explanation = Explanation { root };
        debug!(event = %Event::ExplainComplete, kind = "why", attr, steps = explanation.root.step_count(), "explanation built");
        explanation
    }

    /// Full derivation chain of `attr = value`, through rule
    /// justifications at every level down to given facts.
    pub fn how(&self, attr: &str, value: &Value) -> Explanation {
        let mut branch = Vec::new();
        let root = self.how_node(Fact::new(attr, value.clone()), &mut branch);

        let explanation = Explanation { root };
        debug!(event = %Event::ExplainComplete, kind = "how", attr, steps = explanation.root.step_count(), "explanation built");
        explanation
    }

    fn how_node(&self, fact: Fact, branch: &mut Vec<String>) -> ExplanationNode {
        let j = match self.lookup(&fact) {
            Lookup::Missing => return ExplanationNode::NotEstablished { fact },
            Lookup::NoJustification => return ExplanationNode::NoProvenance { fact },
            Lookup::Found(j) => j,
        };
        if !j.is_derived() {
            return ExplanationNode::Given {
                fact,
                provenance: j.provenance,
            };
        }
        if branch.contains(&fact.attr) {
            return ExplanationNode::Cycle { fact };
        }

        branch.push(fact.attr.clone());
        let premises = j
            .premises
            .iter()
            .map(|p| self.how_node(self.current_or(p), branch))
            .collect();
        branch.pop();

        self.derived(fact, j, premises)
    }

    fn derived(&self, fact: Fact, j: &Justification, premises: Vec<ExplanationNode>) -> ExplanationNode {
        // Only derived justifications reach here.
        let rule_id = j.rule_id.unwrap_or_default();
        let rule_text = self
            .kb
            .rule(rule_id)
            .map(|r| r.display_text())
            .filter(|t| !t.is_empty());
        ExplanationNode::Derived {
            fact,
            rule_id,
            rule_text,
            provenance: j.provenance,
            premises,
        }
    }

    /// The premise attribute's current fact, or the recorded premise once
    /// the attribute is no longer known
    fn current_or(&self, premise: &Fact) -> Fact {
        match self.kb.fact(&premise.attr) {
            Some(current) => Fact::new(premise.attr.clone(), current.clone()),
            None => premise.clone(),
        }
    }

    fn lookup(&self, fact: &Fact) -> Lookup<'a> {
        if !self.kb.has_fact(&fact.attr, &fact.value) {
            return Lookup::Missing;
        }
        match self.kb.justification(&fact.attr) {
            Some(j) => Lookup::Found(j),
            None => Lookup::NoJustification,
        }
    }
}

enum Lookup<'a> {
    Missing,
    NoJustification,
    Found(&'a Justification),
}
