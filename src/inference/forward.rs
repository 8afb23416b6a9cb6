//! Forward chaining
//!
//! Data-driven fixpoint loop. Each round scans every rule in insertion
//! order and asserts the conclusion of every rule whose conditions hold
//! and whose conclusion is not already an identical known fact.
//!
//! Facts asserted earlier in a round are visible to rules later in the same
//! round, so a chain of dependent rules written in order can complete in a
//! single round.

use tracing::{debug, info, warn};

use crate::knowledge::{Fact, Justification, KnowledgeBase, Provenance, RuleId};
use crate::observability::Event;

use super::filters::ConditionEvaluator;

/// Default round cap
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// A fact asserted by a forward run
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFact {
    pub fact: Fact,
    pub rule_id: RuleId,
    /// 1-based round number
    pub iteration: usize,
}

/// Result of a forward run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardOutcome {
    /// Newly asserted facts, in derivation order
    pub derived: Vec<DerivedFact>,
    /// Rounds executed
    pub rounds: usize,
    /// False when the run stopped at the cap with the last round still
    /// producing facts
    pub reached_fixpoint: bool,
}

impl ForwardOutcome {
    /// Derived facts without their bookkeeping
    pub fn facts(&self) -> Vec<Fact> {
        self.derived.iter().map(|d| d.fact.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.derived.is_empty()
    }

    pub fn len(&self) -> usize {
        self.derived.len()
    }
}

/// Runs forward chaining over a knowledge base
#[derive(Debug, Clone, Copy)]
pub struct ForwardChainer {
    max_iterations: usize,
}

impl Default for ForwardChainer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl ForwardChainer {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Extends the fact set until fixpoint or the round cap.
    ///
    /// Only asserts; never retracts.
    pub fn run(&self, kb: &mut KnowledgeBase) -> ForwardOutcome {
        info!(
            event = %Event::ForwardBegin,
            rules = kb.rule_count(),
            facts = kb.fact_count(),
            max_iterations = self.max_iterations,
            "forward chaining started"
        );

        let mut outcome = ForwardOutcome::default();

        for iteration in 1..=self.max_iterations {
            outcome.rounds = iteration;
            let mut progressed = false;

            for idx in 0..kb.rule_count() {
                let rule = &kb.rules()[idx];
                let premises = match ConditionEvaluator::conditions_hold(kb, &rule.conditions) {
                    Some(premises) => premises,
                    None => continue,
                };
                if kb.has_fact(&rule.conclusion.attr, &rule.conclusion.value) {
                    continue;
                }

                let rule_id = rule.id;
                let fact = rule.conclusion.to_fact();
                kb.assert_derived(
                    &fact.attr,
                    fact.value.clone(),
                    Justification::derived(rule_id, premises, Provenance::Forward { iteration }),
                );
                debug!(
                    event = %Event::RuleFired,
                    rule_id,
                    iteration,
                    fact = %fact,
                    "rule fired"
                );

                outcome.derived.push(DerivedFact {
                    fact,
                    rule_id,
                    iteration,
                });
                progressed = true;
            }

            if !progressed {
                outcome.reached_fixpoint = true;
                break;
            }
        }

        if outcome.reached_fixpoint {
            info!(
                event = %Event::ForwardComplete,
                derived = outcome.derived.len(),
                rounds = outcome.rounds,
                "forward chaining reached fixpoint"
            );
        } else {
            warn!(
                event = %Event::ForwardCapReached,
                derived = outcome.derived.len(),
                rounds = outcome.rounds,
                "forward chaining stopped at iteration cap"
            );
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Conclusion, Condition, Operator};
    use crate::value::Value;

    fn add(kb: &mut KnowledgeBase, conds: Vec<Condition>, attr: &str, value: impl Into<Value>) -> RuleId {
        kb.add_rule(conds, Conclusion::new(attr, value), "").unwrap()
    }

    #[test]
    fn test_same_round_cascade() {
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::new("Temperatura", Operator::Gt, 38.0)], "Febre", "Sim");
        add(&mut kb, vec![Condition::eq("Febre", "Sim")], "Risco", "Alto");
        kb.add_fact("Temperatura", 39.2).unwrap();

        let outcome = ForwardChainer::default().run(&mut kb);

        assert_eq!(
            outcome.facts(),
            vec![Fact::new("Febre", "Sim"), Fact::new("Risco", "Alto")]
        );
        assert!(outcome.derived.iter().all(|d| d.iteration == 1));
        assert_eq!(outcome.rounds, 2);
        assert!(outcome.reached_fixpoint);
        assert_eq!(
            kb.justification("Risco").unwrap().provenance,
            Provenance::Forward { iteration: 1 }
        );
    }

    #[test]
    fn test_reverse_order_needs_second_round() {
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::eq("Febre", "Sim")], "Risco", "Alto");
        add(&mut kb, vec![Condition::new("Temperatura", Operator::Gt, 38.0)], "Febre", "Sim");
        kb.add_fact("Temperatura", 39.2).unwrap();

        let outcome = ForwardChainer::default().run(&mut kb);

        let iterations: Vec<_> = outcome.derived.iter().map(|d| (d.fact.attr.as_str(), d.iteration)).collect();
        assert_eq!(iterations, vec![("Febre", 1), ("Risco", 2)]);
        assert_eq!(
            kb.justification("Risco").unwrap().provenance.to_string(),
            "forward(iteration=2)"
        );
    }

    #[test]
    fn test_premises_recorded() {
        let mut kb = KnowledgeBase::new();
        let id = add(
            &mut kb,
            vec![Condition::eq("A", 1.0), Condition::new("B", Operator::Le, 5.0)],
            "C",
            true,
        );
        kb.add_fact("A", 1.0).unwrap();
        kb.add_fact("B", 2.0).unwrap();

        ForwardChainer::default().run(&mut kb);

        let j = kb.justification("C").unwrap();
        assert_eq!(j.rule_id, Some(id));
        assert_eq!(j.premises, vec![Fact::new("A", 1.0), Fact::new("B", 2.0)]);
    }

    #[test]
    fn test_identical_fact_not_rejustified() {
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::eq("A", 1.0)], "B", 2.0);
        kb.add_fact("A", 1.0).unwrap();
        kb.add_fact("B", 2.0).unwrap();

        let outcome = ForwardChainer::default().run(&mut kb);

        assert!(outcome.is_empty());
        assert_eq!(outcome.rounds, 1);
        assert_eq!(kb.justification("B"), Some(&Justification::base()));
    }

    #[test]
    fn test_second_run_derives_nothing() {
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::eq("A", 1.0)], "B", 2.0);
        add(&mut kb, vec![Condition::eq("B", 2.0)], "C", 3.0);
        kb.add_fact("A", 1.0).unwrap();

        let chainer = ForwardChainer::default();
        assert_eq!(chainer.run(&mut kb).len(), 2);
        assert!(chainer.run(&mut kb).is_empty());
    }

    #[test]
    fn test_cap_stops_silently() {
        // X flips between two values forever.
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::eq("X", 0.0)], "X", 1.0);
        add(&mut kb, vec![Condition::eq("X", 1.0)], "X", 0.0);
        kb.add_fact("X", 0.0).unwrap();

        let outcome = ForwardChainer::new(3).run(&mut kb);

        assert_eq!(outcome.rounds, 3);
        assert!(!outcome.reached_fixpoint);
        assert_eq!(outcome.len(), 6);
    }

    #[test]
    fn test_zero_cap_runs_nothing() {
        let mut kb = KnowledgeBase::new();
        add(&mut kb, vec![Condition::eq("A", 1.0)], "B", 2.0);
        kb.add_fact("A", 1.0).unwrap();

        let outcome = ForwardChainer::new(0).run(&mut kb);
        assert!(outcome.is_empty());
        assert_eq!(outcome.rounds, 0);
        assert!(!kb.contains("B"));
    }

    #[test]
    fn test_empty_knowledge_base() {
        let mut kb = KnowledgeBase::new();
        let outcome = ForwardChainer::default().run(&mut kb);
        assert!(outcome.is_empty());
        assert!(outcome.reached_fixpoint);
    }
}
