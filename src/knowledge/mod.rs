//! Knowledge store subsystem for kbagent
//!
//! Holds facts (attribute → current value), rules (ordered, immutable
//! once added) and justifications (attribute → provenance record).
//!
//! # Invariants
//!
//! - At most one fact per attribute; asserting again overwrites value and
//!   provenance
//! - Every attribute with a fact has exactly one justification, and vice versa
//! - Rule ids are unique, positive and never reused
//! - Attribute catalogs are derived from the current rules, never stored
//!   independently of them

mod catalog;
mod document;
mod errors;
mod store;
mod types;

pub use catalog::AttributeCatalog;
pub use document::KnowledgeDocument;
pub use errors::{KnowledgeError, KnowledgeResult};
pub use store::{KnowledgeBase, DEFAULT_EXAMPLE_VALUES};
pub use types::{
    Conclusion, Condition, Fact, Justification, Operator, Provenance, Rule, RuleId,
};
