#![no_main]

use confcheck::check::parse_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Only panics matter; malformed lists are expected to return None.
        let _ = parse_list(text);
    }
});
