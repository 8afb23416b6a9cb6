//! Backward chaining
//!
//! Goal-driven recursive search for a single `(attribute, value)` pair.
//!
//! # Algorithm
//!
//! 1. A goal already in the visited set fails (cycle guard)
//! 2. A goal that is already a known fact succeeds, its justification stands
//! 3. Rules concluding the goal are tried in insertion order; the first one
//!    whose conditions all resolve wins
//! 4. A condition on a known attribute must hold as-is; a condition on an
//!    unknown attribute is proved recursively only when it is an equality
//!
//! The visited set is shared by the whole proof tree of one top-level call,
//! so each pair is attempted at most once per call.

use tracing::{debug, info, warn};

use crate::knowledge::{Fact, Justification, KnowledgeBase, Provenance, Rule};
use crate::observability::Event;
use crate::value::Value;

use super::filters::ConditionEvaluator;

/// Default recursion bound.
///
/// Depth counts nested sub-goal proofs below the top-level goal, not the
/// length of the rule chain: a known leaf premise adds no depth.
pub const DEFAULT_MAX_PROOF_DEPTH: usize = 256;

/// Proves goals against a knowledge base
#[derive(Debug, Clone, Copy)]
pub struct BackwardChainer {
    max_depth: usize,
}

impl Default for BackwardChainer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROOF_DEPTH)
    }
}

impl BackwardChainer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Attempts to prove `attr = value`.
    ///
    /// On success the goal is a known fact afterwards (tagged `backward`
    /// unless it was already known). On failure the store is left exactly
    /// as it was before the call.
    pub fn prove(&self, kb: &mut KnowledgeBase, attr: &str, value: &Value) -> bool {
        info!(event = %Event::ProofBegin, goal = %Fact::new(attr, value.clone()), "proof started");

        let checkpoint = kb.snapshot();
        let mut search = ProofSearch {
            kb: &mut *kb,
            visited: VisitedGoals::default(),
            max_depth: self.max_depth,
        };
        let proved = search.prove_goal(attr, value, 0);
        let attempted = search.visited.len();

        if proved {
            info!(event = %Event::ProofSucceeded, goal = %Fact::new(attr, value.clone()), attempted, "goal proved");
        } else {
            kb.restore(checkpoint);
            info!(event = %Event::ProofFailed, goal = %Fact::new(attr, value.clone()), attempted, "goal not proved");
        }
        proved
    }
}

/// (attribute, value) pairs already attempted in one proof tree
#[derive(Debug, Default)]
struct VisitedGoals {
    goals: Vec<Fact>,
}

impl VisitedGoals {
    /// Records a goal. Returns false if it was already recorded.
    fn insert(&mut self, attr: &str, value: &Value) -> bool {
        if self.goals.iter().any(|g| g.attr == attr && &g.value == value) {
            return false;
        }
        self.goals.push(Fact::new(attr, value.clone()));
        true
    }

    fn len(&self) -> usize {
        self.goals.len()
    }
}

/// State of one top-level proof
struct ProofSearch<'a> {
    kb: &'a mut KnowledgeBase,
    visited: VisitedGoals,
    max_depth: usize,
}

impl ProofSearch<'_> {
    fn prove_goal(&mut self, attr: &str, value: &Value, depth: usize) -> bool {
        if depth > self.max_depth {
            warn!(event = %Event::ProofDepthLimit, attr, depth, "proof depth limit reached");
            return false;
        }
        if !self.visited.insert(attr, value) {
            debug!(event = %Event::ProofCycle, attr, value = %value, "goal already attempted");
            return false;
        }
        if self.kb.has_fact(attr, value) {
            return true;
        }

        let candidates: Vec<Rule> = self.kb.rules_concluding(attr, value).cloned().collect();
        for rule in &candidates {
            if let Some(premises) = self.try_rule(rule, depth) {
                self.kb.assert_derived(
                    attr,
                    value.clone(),
                    Justification::derived(rule.id, premises, Provenance::Backward),
                );
                debug!(rule_id = rule.id, attr, value = %value, depth, "subgoal proved");
                return true;
            }
        }
        false
    }

    /// Resolves a candidate rule's conditions left to right.
    ///
    /// Returns the premises used, pre-known and freshly proved alike.
    fn try_rule(&mut self, rule: &Rule, depth: usize) -> Option<Vec<Fact>> {
        let mut premises = Vec::with_capacity(rule.conditions.len());

        for cond in &rule.conditions {
            if let Some(known) = self.kb.fact(&cond.attr) {
                if !ConditionEvaluator::holds(known, cond.op, &cond.value) {
                    return None;
                }
                premises.push(Fact::new(cond.attr.clone(), known.clone()));
            } else if cond.op.is_equality() {
                if !self.prove_goal(&cond.attr, &cond.value, depth + 1) {
                    return None;
                }
                let proved = self
                    .kb
                    .fact(&cond.attr)
                    .cloned()
                    .unwrap_or_else(|| cond.value.clone());
                premises.push(Fact::new(cond.attr.clone(), proved));
            } else {
                // No value can be guessed for an inequality on an unknown attribute.
                return None;
            }
        }

        Some(premises)
    }
}
