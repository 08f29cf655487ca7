//! Fuzz target for member-name validation.
//!
//! Any name that validates must map to a relative path with no parent or
//! root components.
//!
//! Run with: cargo +nightly fuzz run member_path

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Component;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(path) = mphkit::MemberPath::new(name) {
        let relative = path.to_relative_path();
        assert!(
            relative
                .components()
                .all(|c| matches!(c, Component::Normal(_))),
            "unsafe component in {:?}",
            relative
        );
    }
});
