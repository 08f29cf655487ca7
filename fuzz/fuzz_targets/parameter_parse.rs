//! Fuzz target for parameter extraction and patching on arbitrary text.
//!
//! Run with: cargo +nightly fuzz run parameter_parse

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let table = mphkit::params::parse_parameters(text);

    let edits = table.iter().map(|p| (p.name.as_str(), p.value.as_str()));
    let _ = mphkit::edit::patch_expressions(text, edits);

    if let Some(first) = table.first() {
        if let Ok(patched) = mphkit::edit::patch_expressions(text, [(first.name.as_str(), "1<&>\"'")]) {
            let _ = mphkit::params::parse_parameters(&patched.text);
        }
    }
});
