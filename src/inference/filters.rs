//! Condition evaluation
//!
//! Evaluates conditions strictly against the current fact for their
//! attribute. Total: incompatible operands fail the condition, they never
//! raise.

use crate::knowledge::{Condition, Fact, KnowledgeBase, Operator};
use crate::value::{as_member_list, as_number, Value};

/// Evaluates conditions against known facts
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Checks a known value against an operator and operand
    pub fn holds(known: &Value, op: Operator, operand: &Value) -> bool {
        match op {
            Operator::Eq => known == operand,
            Operator::Ne => known != operand,
            Operator::Lt => Self::numeric(known, operand, |a, b| a < b),
            Operator::Le => Self::numeric(known, operand, |a, b| a <= b),
            Operator::Gt => Self::numeric(known, operand, |a, b| a > b),
            Operator::Ge => Self::numeric(known, operand, |a, b| a >= b),
            Operator::In => Self::member(known, operand),
        }
    }

    /// Checks a single condition against the store
    pub fn condition_holds(kb: &KnowledgeBase, condition: &Condition) -> bool {
        kb.fact(&condition.attr)
            .is_some_and(|known| Self::holds(known, condition.op, &condition.value))
    }

    /// Checks a conjunction of conditions (AND semantics).
    ///
    /// Returns the facts consulted, in condition order, when every
    /// condition holds. Stops at the first absent attribute or failing
    /// condition and returns `None`.
    pub fn conditions_hold(kb: &KnowledgeBase, conditions: &[Condition]) -> Option<Vec<Fact>> {
        let mut premises = Vec::with_capacity(conditions.len());
        for cond in conditions {
            let known = kb.fact(&cond.attr)?;
            if !Self::holds(known, cond.op, &cond.value) {
                return None;
            }
            premises.push(Fact::new(cond.attr.clone(), known.clone()));
        }
        Some(premises)
    }

    /// Ordering comparison (numeric only, text coerced when it parses)
    fn numeric(known: &Value, operand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
        match (as_number(known), as_number(operand)) {
            (Some(a), Some(b)) => cmp(a, b),
            _ => false,
        }
    }

    /// Membership against a list or a bracketed list literal
    fn member(known: &Value, operand: &Value) -> bool {
        as_member_list(operand).is_some_and(|items| items.contains(known))
    }
}
