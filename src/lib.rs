//! kbagent - a small rule-based reasoning engine
//!
//! Facts are attribute/value pairs, rules are `SE ... ENTÃO ...` implications.
//! The engine derives facts by forward chaining, proves goals by backward
//! chaining, and explains every derived fact by the rule and premises that
//! produced it.

pub mod cli;
pub mod explain;
pub mod inference;
pub mod knowledge;
pub mod observability;
pub mod parser;
pub mod session;
pub mod snapshot;
pub mod value;
