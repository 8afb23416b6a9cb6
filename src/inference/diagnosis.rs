//! Failure diagnostics
//!
//! Read-only report on why a goal is not established: every rule
//! concluding the goal, with the status of each of its conditions against
//! the current facts. Performs no recursion and no mutation.

use std::fmt;

use crate::knowledge::{Condition, Fact, KnowledgeBase, RuleId};
use crate::value::Value;

use super::filters::ConditionEvaluator;

/// Status of one condition against the current facts
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionStatus {
    /// No fact for the attribute
    Missing,
    /// Known value satisfies the condition
    Satisfied,
    /// Known value does not satisfy the condition
    Mismatched { actual: Value },
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::Missing => "missing",
            ConditionStatus::Satisfied => "satisfied",
            ConditionStatus::Mismatched { .. } => "mismatched",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionCheck {
    pub condition: Condition,
    pub status: ConditionStatus,
}

/// A rule that could have established the goal
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRule {
    pub rule_id: RuleId,
    pub text: String,
    pub checks: Vec<ConditionCheck>,
}

impl CandidateRule {
    /// Returns true if every condition currently holds
    pub fn is_satisfied(&self) -> bool {
        self.checks
            .iter()
            .all(|c| c.status == ConditionStatus::Satisfied)
    }
}

/// Diagnostic report for one goal
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub goal: Fact,
    pub candidates: Vec<CandidateRule>,
}

impl Diagnosis {
    /// Inspects every rule concluding `attr = value`, in rule order
    pub fn diagnose(kb: &KnowledgeBase, attr: &str, value: &Value) -> Self {
        let candidates = kb
            .rules_concluding(attr, value)
            .map(|rule| CandidateRule {
                rule_id: rule.id,
                text: rule.display_text(),
                checks: rule
                    .conditions
                    .iter()
                    .map(|cond| ConditionCheck {
                        condition: cond.clone(),
                        status: check(kb, cond),
                    })
                    .collect(),
            })
            .collect();

        Self {
            goal: Fact::new(attr, value.clone()),
            candidates,
        }
    }

    /// Returns true if no rule concludes the goal
    pub fn has_no_candidates(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn check(kb: &KnowledgeBase, cond: &Condition) -> ConditionStatus {
    match kb.fact(&cond.attr) {
        None => ConditionStatus::Missing,
        Some(known) if ConditionEvaluator::holds(known, cond.op, &cond.value) => {
            ConditionStatus::Satisfied
        }
        Some(known) => ConditionStatus::Mismatched {
            actual: known.clone(),
        },
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.candidates.is_empty() {
            return writeln!(f, "No rule concludes {}", self.goal);
        }

        writeln!(f, "Rules concluding {}:", self.goal)?;
        for candidate in &self.candidates {
            writeln!(f, "- Rule #{}: {}", candidate.rule_id, candidate.text)?;
            for check in &candidate.checks {
                match &check.status {
                    ConditionStatus::Mismatched { actual } => writeln!(
                        f,
                        "    [{}] {} (known: {})",
                        check.status.as_str(),
                        check.condition,
                        actual
                    )?,
                    status => writeln!(f, "    [{}] {}", status.as_str(), check.condition)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Conclusion, Operator};

    fn kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(
            vec![
                Condition::new("Temperatura", Operator::Gt, 38.0),
                Condition::eq("Tosse", "Sim"),
                Condition::eq("Idade", "Idoso"),
            ],
            Conclusion::new("Risco", "Alto"),
            "",
        )
        .unwrap();
        kb
    }

    #[test]
    fn test_statuses() {
        let mut kb = kb();
        kb.add_fact("Temperatura", 39.0).unwrap();
        kb.add_fact("Idade", "Jovem").unwrap();
        let before = kb.clone();

        let d = Diagnosis::diagnose(&kb, "Risco", &Value::text("Alto"));

        assert_eq!(kb, before);
        assert_eq!(d.candidates.len(), 1);
        let statuses: Vec<_> = d.candidates[0].checks.iter().map(|c| c.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![
                ConditionStatus::Satisfied,
                ConditionStatus::Missing,
                ConditionStatus::Mismatched {
                    actual: Value::text("Jovem")
                },
            ]
        );
        assert!(!d.candidates[0].is_satisfied());
    }

    #[test]
    fn test_no_candidates() {
        let d = Diagnosis::diagnose(&kb(), "Risco", &Value::text("Baixo"));
        assert!(d.has_no_candidates());
        assert_eq!(d.to_string(), "No rule concludes Risco = Baixo\n");
    }

    #[test]
    fn test_display_lists_conditions() {
        let mut kb = kb();
        kb.add_fact("Idade", "Jovem").unwrap();
        let text = Diagnosis::diagnose(&kb, "Risco", &Value::text("Alto")).to_string();
        assert!(text.contains("Rule #1"));
        assert!(text.contains("[missing] Temperatura > 38"));
        assert!(text.contains("[mismatched] Idade = Idoso (known: Jovem)"));
    }
}
