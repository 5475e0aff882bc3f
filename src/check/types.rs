//! Builtin type checks.
//!
//! Configuration often arrives as text (environment variables, command-line
//! flags), so each type also accepts its common string encoding.

use serde_json::{Number, Value};

use super::TypeMarker;
use crate::value::coerce_text;

const TRUE_TOKENS: &[&str] = &["true", "1", "yes"];
const FALSE_TOKENS: &[&str] = &["false", "0", "no"];

/// Returns `true` when `value` is compatible with `marker`.
#[must_use]
pub fn matches_type(marker: TypeMarker, value: &Value) -> bool {
    match marker {
        TypeMarker::Object => match value {
            Value::Object(_) => true,
            Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
            _ => false,
        },
        TypeMarker::Array => match value {
            Value::Array(_) => true,
            Value::String(s) => parse_list(s).is_some(),
            _ => false,
        },
        TypeMarker::String => value.is_string(),
        TypeMarker::Number => match value {
            Value::Number(n) => number_is_lossless(n),
            Value::String(s) => number_text_is_lossless(s.trim()),
            _ => false,
        },
        TypeMarker::Boolean => parse_bool(&coerce_text(value)).is_some(),
    }
}

/// Largest integer magnitude an `f64` represents exactly.
const MAX_EXACT_INTEGER: u64 = (1 << 53) - 1;

fn number_is_lossless(n: &Number) -> bool {
    if let Some(u) = n.as_u64() {
        u <= MAX_EXACT_INTEGER
    } else if let Some(i) = n.as_i64() {
        i.unsigned_abs() <= MAX_EXACT_INTEGER
    } else {
        n.as_f64().is_some_and(f64::is_finite)
    }
}

fn number_text_is_lossless(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() {
        false
    } else if digits.bytes().all(|b| b.is_ascii_digit()) {
        text.parse::<i128>()
            .is_ok_and(|i| i.unsigned_abs() <= u128::from(MAX_EXACT_INTEGER))
    } else {
        text.parse::<f64>().is_ok_and(f64::is_finite)
    }
}

/// Interprets a case-insensitive boolean token.
#[must_use]
pub fn parse_bool(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Parses a permissive comma-separated list.
///
/// The list may be wrapped in `[` `]`. Elements are trimmed and are either
/// bare text without quotes or commas, or single/double-quoted text in which
/// a backslash escapes the following character. Returns `None` when the text
/// is not a well-formed list. Blank input is the empty list.
///
/// ```
/// use confcheck::check::parse_list;
///
/// let items = parse_list(r#"a, "b,c", 'd'"#).unwrap();
/// assert_eq!(items, ["a", "b,c", "d"]);
/// ```
#[must_use]
pub fn parse_list(text: &str) -> Option<Vec<String>> {
    let trimmed = text.trim();
    let inner = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => rest.strip_suffix(']')?,
        (None, false) => trimmed,
        _ => return None,
    };
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let item = match chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                chars.next();
                let mut item = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => item.push(chars.next()?),
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => item.push(c),
                    }
                }
                if !closed {
                    return None;
                }
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
                item
            }
            _ => {
                let mut item = String::new();
                while let Some(c) = chars.next_if(|c| *c != ',') {
                    if c == '"' || c == '\'' {
                        return None;
                    }
                    item.push(c);
                }
                item.trim_end().to_string()
            }
        };
        items.push(item);

        match chars.next() {
            None => break,
            Some(',') => {}
            Some(_) => return None,
        }
    }
    Some(items)
}
