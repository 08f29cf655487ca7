//! Fuzz target for Container::from_reader with arbitrary byte input.
//!
//! Exercises ZIP parsing plus the metadata and parameter readers on
//! potentially malformed or adversarial input, looking for panics or hangs.
//!
//! Run with: cargo +nightly fuzz run container_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let Ok(mut container) = mphkit::Container::from_reader(Cursor::new(data)) else {
        return;
    };

    // We don't care about the results - we're looking for panics or hangs
    if let Ok(members) = container.members() {
        for member in &members {
            let _ = member.size_label();
            let _ = mphkit::MemberPath::new(&member.name);
        }
    }
    let _ = container.info();
    let _ = container.parameters();
});
