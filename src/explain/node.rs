//! Explanation tree and its text rendering

use std::fmt;

use crate::knowledge::{Fact, Provenance, RuleId};

/// One line of an explanation, with its supporting sub-explanations
#[derive(Debug, Clone, PartialEq)]
pub enum ExplanationNode {
    /// The queried pair is not the current fact
    NotEstablished { fact: Fact },
    /// The fact is known but has no justification record
    NoProvenance { fact: Fact },
    /// Directly asserted fact, reached while unwinding a derivation
    Given { fact: Fact, provenance: Provenance },
    /// Non-derived premise cited by a `why` explanation
    KnownPremise { fact: Fact },
    /// Fact asserted by a rule
    Derived {
        fact: Fact,
        rule_id: RuleId,
        /// `None` once the rule has been removed
        rule_text: Option<String>,
        provenance: Provenance,
        premises: Vec<ExplanationNode>,
    },
    /// Fact already being explained higher up on the same branch
    Cycle { fact: Fact },
}

impl ExplanationNode {
    pub fn fact(&self) -> &Fact {
        match self {
            ExplanationNode::NotEstablished { fact }
            | ExplanationNode::NoProvenance { fact }
            | ExplanationNode::Given { fact, .. }
            | ExplanationNode::KnownPremise { fact }
            | ExplanationNode::Derived { fact, .. }
            | ExplanationNode::Cycle { fact } => fact,
        }
    }

    pub fn premises(&self) -> &[ExplanationNode] {
        match self {
            ExplanationNode::Derived { premises, .. } => premises,
            _ => &[],
        }
    }

    /// Number of rule applications in this subtree
    pub fn step_count(&self) -> usize {
        match self {
            ExplanationNode::Derived { premises, .. } => {
                1 + premises.iter().map(ExplanationNode::step_count).sum::<usize>()
            }
            _ => 0,
        }
    }

    fn write_line(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        match self {
            ExplanationNode::NotEstablished { fact } => {
                out.push_str(&format!("{} is not established", fact));
            }
            ExplanationNode::NoProvenance { fact } => {
                out.push_str(&format!("{} (no recorded justification)", fact));
            }
            ExplanationNode::Given { fact, provenance } => {
                out.push_str(&format!("{} (given) [{}]", fact, provenance));
            }
            ExplanationNode::KnownPremise { fact } => {
                out.push_str(&format!("premise: {} (known)", fact));
            }
            ExplanationNode::Derived {
                fact,
                rule_id,
                rule_text,
                provenance,
                ..
            } => {
                out.push_str(&format!("{} via Rule #{}", fact, rule_id));
                if let Some(text) = rule_text {
                    out.push_str(&format!(": '{}'", text));
                }
                out.push_str(&format!(" [{}]", provenance));
            }
            ExplanationNode::Cycle { fact } => {
                out.push_str(&format!("{} (cycle, explained above)", fact));
            }
        }
        out.push('\n');

        for premise in self.premises() {
            premise.write_line(out, depth + 1);
        }
    }
}

/// A rendered-on-demand derivation tree rooted at one fact
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub root: ExplanationNode,
}

impl Explanation {
    /// Returns false when the root fact is not established
    pub fn is_established(&self) -> bool {
        !matches!(self.root, ExplanationNode::NotEstablished { .. })
    }

    /// Renders the tree as indented text, starting at `depth`
    pub fn render(&self, depth: usize) -> String {
        let mut out = String::new();
        self.root.write_line(&mut out, depth);
        out
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}
