//! Snapshot subsystem for kbagent
//!
//! A snapshot is a full, independent deep copy of a knowledge base: facts,
//! justifications, rules, the rule-id counter and the attribute catalogs.
//!
//! # Design Principles
//!
//! - Value semantics: no shared mutable substructure between a snapshot and
//!   the live store
//! - Atomic restore: the store is replaced in a single assignment
//! - Opaque: callers can take and restore, not inspect

mod undo;

pub use undo::{UndoEntry, UndoStack};

use crate::knowledge::KnowledgeBase;

/// Point-in-time copy of a knowledge base
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeSnapshot {
    state: KnowledgeBase,
}

impl KnowledgeBase {
    /// Takes a deep copy of the entire mutable state
    pub fn snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            state: self.clone(),
        }
    }

    /// Replaces the entire mutable state with a snapshot
    pub fn restore(&mut self, snapshot: KnowledgeSnapshot) {
        self.replace(snapshot.state);
    }
}

impl KnowledgeSnapshot {
    /// Returns true if the snapshot matches the given store exactly
    pub fn matches(&self, kb: &KnowledgeBase) -> bool {
        &self.state == kb
    }
}
