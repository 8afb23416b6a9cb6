//! Value model for kbagent
//!
//! A small closed set of comparable kinds used uniformly by facts,
//! condition operands and conclusions: number, text, boolean and list.
//!
//! # Semantics
//!
//! - Equality is structural, no coercion
//! - Ordering needs both sides numeric (text is coerced when it parses)
//! - Membership needs a list operand (a bracketed text literal is decoded)
//! - Every failed coercion fails the comparison, never the caller

mod coerce;
mod text;
mod types;

pub use coerce::{as_member_list, as_number};
pub use text::{decode_list_literal, parse_value, render_token};
pub use types::Value;
