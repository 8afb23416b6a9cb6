//! Explanation subsystem for kbagent
//!
//! Produces deterministic, human-readable derivation trees from recorded
//! justifications:
//!
//! - `why`: the rule that asserted a fact, plus its premises
//! - `how`: the full derivation chain down to given facts
//!
//! # Invariants
//!
//! - Read-only: explaining never mutates the store
//! - Total: unknown facts, missing justifications and cyclic justification
//!   graphs all produce a tree, never an error

mod explainer;
mod node;

pub use explainer::Explainer;
pub use node::{Explanation, ExplanationNode};
