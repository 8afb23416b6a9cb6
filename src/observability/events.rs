//! Observability events for kbagent
//!
//! Every engine-level log line carries one of these as its `event` field.
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Forward chaining
    /// Forward run begins
    ForwardBegin,
    /// A rule fired and asserted its conclusion
    RuleFired,
    /// Forward run reached a fixpoint
    ForwardComplete,
    /// Forward run stopped at the iteration cap
    ForwardCapReached,

    // Backward chaining
    /// Top-level proof attempt begins
    ProofBegin,
    /// Goal proved
    ProofSucceeded,
    /// Goal not proved
    ProofFailed,
    /// Goal already attempted in this proof tree
    ProofCycle,
    /// Recursion bound hit
    ProofDepthLimit,

    // Explanation
    /// Explanation produced
    ExplainComplete,

    // Undo
    /// Snapshot pushed before a mutation
    SnapshotPushed,
    /// Snapshot restored
    UndoApplied,
    /// Undo requested with an empty stack
    UndoEmpty,

    // Knowledge base I/O
    /// Knowledge base loaded from a document
    KnowledgeLoaded,
    /// Knowledge base written to disk
    KnowledgeSaved,
    /// Rules imported from text
    RulesImported,

    // Command layer
    /// Configuration loaded
    ConfigLoaded,
    /// Interactive session started
    SessionStart,
    /// Interactive session ended
    SessionEnd,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ForwardBegin => "FORWARD_BEGIN",
            Event::RuleFired => "RULE_FIRED",
            Event::ForwardComplete => "FORWARD_COMPLETE",
            Event::ForwardCapReached => "FORWARD_CAP_REACHED",

            Event::ProofBegin => "PROOF_BEGIN",
            Event::ProofSucceeded => "PROOF_SUCCEEDED",
            Event::ProofFailed => "PROOF_FAILED",
            Event::ProofCycle => "PROOF_CYCLE",
            Event::ProofDepthLimit => "PROOF_DEPTH_LIMIT",

            Event::ExplainComplete => "EXPLAIN_COMPLETE",

            Event::SnapshotPushed => "SNAPSHOT_PUSHED",
            Event::UndoApplied => "UNDO_APPLIED",
            Event::UndoEmpty => "UNDO_EMPTY",

            Event::KnowledgeLoaded => "KB_LOADED",
            Event::KnowledgeSaved => "KB_SAVED",
            Event::RulesImported => "RULES_IMPORTED",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SessionStart => "SESSION_START",
            Event::SessionEnd => "SESSION_END",
        }
    }

    /// Returns true if this event marks a bound being hit
    pub fn is_limit(&self) -> bool {
        matches!(self, Event::ForwardCapReached | Event::ProofDepthLimit)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
