//! Fuzz target: serial-number normalisation
//!
//! Feeds arbitrary file contents through `device_id::from_raw` and checks
//! that an accepted id never carries a trailing NUL or leading whitespace.
//!
//! cargo fuzz run fuzz_thing_id

#![no_main]

use climate_reporter::adapters::device_id;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(id) = device_id::from_raw(data) {
        assert!(!id.is_empty());
        assert!(!id.ends_with('\0'));
        assert!(!id.starts_with(char::is_whitespace));
    }
});
