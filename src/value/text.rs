//! Textual encoding of values
//!
//! Used by the rule/fact parser and by canonical rule rendering.
//!
//! Token grammar (after trimming):
//! - `'x'` or `"x"` → text `x`
//! - numeric literal (`38`, `-3`, `39.2`, `1e3`) → number
//! - `true` / `false` → boolean
//! - `[...]` → list (JSON array first, then bare comma-separated tokens)
//! - anything else → text

use super::types::{format_number, Value};

/// Parses a single value token.
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();

    if let Some(inner) = strip_quotes(raw) {
        return Value::Text(inner.to_string());
    }

    if let Some(n) = parse_number(raw) {
        return Value::Number(n);
    }

    match raw {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        _ => {}
    }

    if raw.starts_with('[') && raw.ends_with(']') {
        if let Some(items) = decode_list_literal(raw) {
            return Value::List(items);
        }
    }

    Value::Text(raw.to_string())
}

/// Decodes a bracketed list literal.
///
/// Returns `None` when the text is not a well-formed list.
pub fn decode_list_literal(raw: &str) -> Option<Vec<Value>> {
    let raw = raw.trim();
    if !(raw.starts_with('[') && raw.ends_with(']')) || raw.len() < 2 {
        return None;
    }

    if let Ok(items) = serde_json::from_str::<Vec<Value>>(raw) {
        return Some(items);
    }

    let inner = raw[1..raw.len() - 1].trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }

    inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                None
            } else {
                Some(parse_value(part))
            }
        })
        .collect()
}

/// Renders a value as a token that [`parse_value`] maps back to the same value.
pub fn render_token(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Boolean(b) => b.to_string(),
        Value::List(items) => {
            serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
        }
        Value::Text(s) => {
            if needs_quotes(s) {
                if s.contains('"') {
                    format!("'{}'", s)
                } else {
                    format!("\"{}\"", s)
                }
            } else {
                s.clone()
            }
        }
    }
}

/// Rule keywords, matched case-insensitively
const KEYWORDS: &[&str] = &["SE", "E", "ENTÃO", "ENTAO"];

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.trim() != s
        || s.split_whitespace().count() > 1
        || s.contains("->")
        || s.contains("=>")
        || s.contains(['[', ']', '\'', '"'])
        || KEYWORDS.iter().any(|kw| s.to_uppercase() == *kw)
        || parse_value(s) != Value::Text(s.to_string())
}

fn strip_quotes(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    let first = raw.chars().next()?;
    let last = raw.chars().last()?;
    if first == last && (first == '\'' || first == '"') {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty()
        || !raw.chars().any(|c| c.is_ascii_digit())
        || !raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}
