//! Stringification of configuration values.
//!
//! Checks and error messages both need a textual view of a dynamic
//! `serde_json::Value`. Two views exist: [`render`] for humans and
//! enumeration comparison, and [`coerce_text`] for the format checks, which
//! treat an absent value as empty text.

use std::borrow::Cow;

use serde_json::Value;

/// Marker inserted between the head and tail of a truncated value.
const ELLIPSIS: &str = "...";

/// Smallest display budget honoured by [`truncate_for_display`].
pub const MIN_DISPLAY_BUDGET: usize = 5;

/// Renders a value as text.
///
/// Strings are returned verbatim; every other value is rendered as compact
/// JSON (`null`, `true`, `3000`, `{"a":1}`).
#[must_use]
pub fn render(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Renders a value as the text a format check inspects.
///
/// Identical to [`render`] except that `null` becomes the empty string.
#[must_use]
pub fn coerce_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        other => render(other),
    }
}

/// Bounds `text` to at most `budget` characters.
///
/// Text within the budget is returned unchanged. Longer text keeps a prefix
/// and a suffix around `...`; the prefix receives the extra character when
/// the remaining budget is odd. Counting is by `char`, so multi-byte
/// characters are never split.
#[must_use]
pub fn truncate_for_display(text: &str, budget: usize) -> Cow<'_, str> {
    let budget = budget.max(MIN_DISPLAY_BUDGET);
    let len = text.chars().count();
    if len <= budget {
        return Cow::Borrowed(text);
    }

    let keep = budget - ELLIPSIS.len();
    let tail_len = keep / 2;
    let head_len = keep - tail_len;

    let head_end = text
        .char_indices()
        .nth(head_len)
        .map_or(text.len(), |(i, _)| i);
    let tail_start = text
        .char_indices()
        .nth(len - tail_len)
        .map_or(text.len(), |(i, _)| i);

    let mut out = String::with_capacity(head_end + ELLIPSIS.len() + (text.len() - tail_start));
    out.push_str(&text[..head_end]);
    out.push_str(ELLIPSIS);
    out.push_str(&text[tail_start..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_keeps_strings_verbatim() {
        assert_eq!(render(&json!("a \"b\"")), "a \"b\"");
    }

    #[test]
    fn render_uses_json_for_other_values() {
        assert_eq!(render(&json!(3000)), "3000");
        assert_eq!(render(&json!(true)), "true");
        assert_eq!(render(&Value::Null), "null");
        assert_eq!(render(&json!({"a": 1})), r#"{"a":1}"#);
        assert_eq!(render(&json!(["x", 2])), r#"["x",2]"#);
    }

    #[test]
    fn coerce_text_treats_null_as_empty() {
        assert_eq!(coerce_text(&Value::Null), "");
        assert_eq!(coerce_text(&json!(8080)), "8080");
    }

    #[test]
    fn short_text_is_untouched() {
        assert!(matches!(truncate_for_display("hello", 10), Cow::Borrowed("hello")));
        assert_eq!(truncate_for_display("0123456789", 10), "0123456789");
    }

    #[test]
    fn long_text_keeps_head_and_tail() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        // budget 10 -> 7 kept chars: 4 head, 3 tail
        assert_eq!(truncate_for_display(text, 10), "abcd...xyz");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ééééééééééééééééééééé";
        let out = truncate_for_display(text, 9);
        assert_eq!(out.chars().count(), 9);
        assert!(out.starts_with("ééé"));
        assert!(out.ends_with("éé"));
    }

    #[test]
    fn tiny_budget_is_raised() {
        assert_eq!(truncate_for_display("abcdefgh", 0), "a...h");
    }
}
