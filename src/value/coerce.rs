//! Coercions used by the ordering and membership operators.
//!
//! Both are fail-closed: `None` means the operator must evaluate to false.

use super::text::decode_list_literal;
use super::types::Value;

/// Numeric view of a value for ordering comparisons.
///
/// Numbers are used as-is, text is coerced when its trimmed content is a
/// finite number. Booleans and lists are never numeric.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Boolean(_) | Value::List(_) => None,
    }
}

/// List view of a membership operand.
///
/// A list is used directly; text is decoded only when it looks like a
/// bracketed literal.
pub fn as_member_list(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::List(items) => Some(items.clone()),
        Value::Text(s) if s.trim_start().starts_with('[') => decode_list_literal(s),
        _ => None,
    }
}
