//! Property tests for message bounds, list parsing and alias equivalence.

use confcheck::check::parse_list;
use confcheck::value::truncate_for_display;
use confcheck::{Format, FormatLibrary, StandardFormats, ValidationError};
use proptest::prelude::*;
use serde_json::json;

/// Quotes `item` with double quotes, escaping backslashes and quotes.
fn quote(item: &str) -> String {
    let mut out = String::from("\"");
    for c in item.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

proptest! {
    #[test]
    fn truncated_text_never_exceeds_budget(text in ".{0,400}", budget in 5usize..200) {
        let shown = truncate_for_display(&text, budget);
        prop_assert!(shown.chars().count() <= budget);
        if text.chars().count() <= budget {
            prop_assert_eq!(&*shown, text.as_str());
        } else {
            prop_assert!(shown.contains("..."));
        }
    }

    #[test]
    fn error_messages_stay_bounded(text in ".{0,2000}") {
        let err = ValidationError::new(json!(text), "must be a UUID")
            .with_key("id")
            .with_display_budget(64);
        let overhead = "id: must be a UUID (got: )".chars().count();
        prop_assert!(err.to_string().chars().count() <= overhead + 64);
    }

    #[test]
    fn quoted_items_round_trip(items in prop::collection::vec(".{0,20}", 1..8)) {
        let text = items.iter().map(|i| quote(i)).collect::<Vec<_>>().join(", ");
        prop_assert_eq!(parse_list(&text), Some(items.clone()));

        let bracketed = format!("[{text}]");
        prop_assert_eq!(parse_list(&bracketed), Some(items));
    }

    #[test]
    fn parse_list_never_panics(text in "\\PC{0,100}") {
        let _ = parse_list(&text);
    }

    #[test]
    fn aliases_agree_with_targets(text in "\\PC{0,40}") {
        let formats = StandardFormats;
        for (alias, target) in [("domain", "fqdn"), ("ipaddress", "ip"), ("integer", "int")] {
            let alias = Format::lookup(alias).unwrap();
            let target = Format::lookup(target).unwrap();
            prop_assert_eq!(alias, target);
            prop_assert_eq!(formats.accepts(alias, &text), formats.accepts(target, &text));
        }
    }
}
