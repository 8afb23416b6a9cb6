//! Parser subsystem for kbagent
//!
//! Turns rule and fact text into structured form:
//!
//! - `SE <cond> [E <cond>]* ENTÃO <attr> = <value>` rules
//! - `Attr = Value` facts
//! - line-based rule files
//!
//! A rule is parsed completely before anything touches the store, so a
//! malformed rule is never partially added.

mod errors;
mod import;
mod rule;

pub use errors::{ParseError, ParseResult};
pub use import::{import_rules, ImportIssue, ImportReport};
pub use rule::{parse_fact, parse_rule, ParsedRule, RuleParser};
