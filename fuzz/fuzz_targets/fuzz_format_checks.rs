#![no_main]

use confcheck::{Format, MemoryStore, Validator};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut validator = Validator::new();
    for name in Format::names() {
        validator.add_rule("value", name);
    }
    let store = MemoryStore::new(json!({ "value": text }));

    // Every format must resolve, and no check may panic on arbitrary text.
    let failures = validator
        .validate_store_silent(&store)
        .expect("all table names resolve");
    for failure in failures {
        let _ = failure.to_string();
    }
});
