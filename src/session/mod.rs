//! Session subsystem for kbagent
//!
//! A [`Session`] owns one knowledge base together with its undo history and
//! engine settings. It is the only mutation path the command layer uses.
//!
//! # Invariants
//!
//! - Every accepted mutating operation records exactly one undo entry
//!   holding the state from immediately before it
//! - Rejected operations (malformed input, unknown ids) leave both the
//!   store and the undo history untouched
//! - Queries and explanations never record undo entries

mod errors;

pub use errors::{SessionError, SessionResult};

use crate::explain::{Explainer, Explanation};
use crate::inference::{BackwardChainer, Diagnosis, ForwardChainer, ForwardOutcome};
use crate::knowledge::{
    Conclusion, Condition, KnowledgeBase, KnowledgeDocument, KnowledgeResult, RuleId,
};
use crate::parser::{import_rules, parse_fact, parse_rule, ImportReport};
use crate::snapshot::{UndoEntry, UndoStack};
use crate::value::Value;

/// Knowledge base plus undo history and engine settings
#[derive(Debug, Default)]
pub struct Session {
    kb: KnowledgeBase,
    undo: UndoStack,
    forward: ForwardChainer,
    backward: BackwardChainer,
}

impl Session {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            kb,
            ..Self::default()
        }
    }

    /// Overrides the engine limits
    pub fn with_limits(mut self, max_iterations: usize, max_proof_depth: usize) -> Self {
        self.forward = ForwardChainer::new(max_iterations);
        self.backward = BackwardChainer::new(max_proof_depth);
        self
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn into_kb(self) -> KnowledgeBase {
        self.kb
    }

    /// Current contents in persisted form
    pub fn document(&self) -> KnowledgeDocument {
        self.kb.to_document()
    }

    // ----- facts -----

    pub fn add_fact(&mut self, attr: &str, value: Value) -> KnowledgeResult<()> {
        let label = format!("add fact {}", attr.trim());
        self.guarded(label, |kb| kb.add_fact(attr, value))
    }

    /// Adds a fact from `Attr = Value` text
    pub fn add_fact_text(&mut self, text: &str) -> SessionResult<()> {
        let fact = parse_fact(text)?;
        Ok(self.add_fact(&fact.attr, fact.value)?)
    }

    /// Removes a fact. Returns the removed value, `None` if unknown.
    pub fn remove_fact(&mut self, attr: &str) -> Option<Value> {
        if !self.kb.contains(attr) {
            return None;
        }
        self.undo.push(&self.kb, format!("remove fact {}", attr));
        self.kb.remove_fact(attr)
    }

    // ----- rules -----

    pub fn add_rule(
        &mut self,
        conditions: Vec<Condition>,
        conclusion: Conclusion,
        text: &str,
    ) -> KnowledgeResult<RuleId> {
        self.guarded("add rule", |kb| kb.add_rule(conditions, conclusion, text))
    }

    /// Parses and adds a rule, keeping `text` as its display text
    pub fn add_rule_text(&mut self, text: &str) -> SessionResult<RuleId> {
        let parsed = parse_rule(text)?;
        Ok(self.add_rule(parsed.conditions, parsed.conclusion, text)?)
    }

    /// Removes a rule. Returns false when no such rule exists.
    pub fn remove_rule(&mut self, id: RuleId) -> bool {
        if self.kb.rule(id).is_none() {
            return false;
        }
        self.undo.push(&self.kb, format!("remove rule #{}", id));
        self.kb.remove_rule(id)
    }

    /// Imports rule lines. Records an undo entry only if a rule was added.
    pub fn import(&mut self, content: &str) -> ImportReport {
        let checkpoint = self.kb.snapshot();
        let report = import_rules(&mut self.kb, content);
        if !report.added.is_empty() {
            self.undo
                .push_snapshot(checkpoint, format!("import {} rule(s)", report.added.len()));
        }
        report
    }

    /// Replaces the whole store with a document
    pub fn load(&mut self, doc: KnowledgeDocument) -> KnowledgeResult<()> {
        self.guarded("load", |kb| kb.load_document(doc))
    }

    // ----- engines -----

    pub fn forward(&mut self) -> ForwardOutcome {
        self.undo.push(&self.kb, "forward");
        self.forward.run(&mut self.kb)
    }

    pub fn prove(&mut self, attr: &str, value: &Value) -> bool {
        self.undo.push(&self.kb, format!("prove {} = {}", attr, value));
        self.backward.prove(&mut self.kb, attr, value)
    }

    pub fn why(&self, attr: &str, value: &Value) -> Explanation {
        Explainer::new(&self.kb).why(attr, value)
    }

    pub fn how(&self, attr: &str, value: &Value) -> Explanation {
        Explainer::new(&self.kb).how(attr, value)
    }

    pub fn diagnose(&self, attr: &str, value: &Value) -> Diagnosis {
        Diagnosis::diagnose(&self.kb, attr, value)
    }

    // ----- undo -----

    /// Rolls back the most recent mutating operation.
    ///
    /// Returns its label, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<String> {
        self.undo.undo(&mut self.kb)
    }

    /// Undo entries, oldest first
    pub fn history(&self) -> &[UndoEntry] {
        self.undo.entries()
    }

    /// Runs a fallible mutation; the undo entry is recorded only on success
    fn guarded<T, E>(
        &mut self,
        label: impl Into<String>,
        op: impl FnOnce(&mut KnowledgeBase) -> Result<T, E>,
    ) -> Result<T, E> {
        let checkpoint = self.kb.snapshot();
        let out = op(&mut self.kb)?;
        self.undo.push_snapshot(checkpoint, label);
        Ok(out)
    }
}
