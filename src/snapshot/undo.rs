//! Undo stack
//!
//! Unbounded LIFO of snapshots. Callers push before every mutation and pop
//! to roll the last one back.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::knowledge::KnowledgeBase;
use crate::observability::Event;

use super::KnowledgeSnapshot;

/// A snapshot plus what it was taken for
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// Operation about to run when the snapshot was taken
    pub label: String,
    pub taken_at: DateTime<Utc>,
    snapshot: KnowledgeSnapshot,
}

/// Stack of snapshots with no depth limit
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the store before an operation named `label`
    pub fn push(&mut self, kb: &KnowledgeBase, label: impl Into<String>) {
        self.push_snapshot(kb.snapshot(), label);
    }

    /// Records a snapshot taken earlier, once the operation it guards has
    /// been accepted
    pub fn push_snapshot(&mut self, snapshot: KnowledgeSnapshot, label: impl Into<String>) {
        let label = label.into();
        debug!(event = %Event::SnapshotPushed, label = %label, depth = self.entries.len() + 1, "snapshot pushed");
        self.entries.push(UndoEntry {
            label,
            taken_at: Utc::now(),
            snapshot,
        });
    }

    /// Restores the most recent snapshot.
    ///
    /// Returns the label of the undone operation, or `None` when the stack
    /// is empty (the store is left untouched).
    pub fn undo(&mut self, kb: &mut KnowledgeBase) -> Option<String> {
        match self.entries.pop() {
            Some(entry) => {
                kb.restore(entry.snapshot);
                debug!(event = %Event::UndoApplied, label = %entry.label, depth = self.entries.len(), "undo applied");
                Some(entry.label)
            }
            None => {
                debug!(event = %Event::UndoEmpty, "nothing to undo");
                None
            }
        }
    }

    /// Entries from oldest to newest
    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
