//! Inference subsystem for kbagent
//!
//! Forward chaining, backward chaining and failure diagnostics over a
//! [`KnowledgeBase`](crate::knowledge::KnowledgeBase).
//!
//! # Invariants
//!
//! - Condition evaluation is total: incompatible operands fail closed
//! - Forward chaining only asserts, never retracts
//! - Backward chaining attempts each (attribute, value) pair at most once
//!   per top-level proof and leaves the store untouched on failure
//! - Diagnostics never mutate

mod backward;
mod diagnosis;
mod filters;
mod forward;

pub use backward::{BackwardChainer, DEFAULT_MAX_PROOF_DEPTH};
pub use diagnosis::{CandidateRule, ConditionCheck, ConditionStatus, Diagnosis};
pub use filters::ConditionEvaluator;
pub use forward::{DerivedFact, ForwardChainer, ForwardOutcome, DEFAULT_MAX_ITERATIONS};
