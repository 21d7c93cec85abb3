//! Fuzz target: DHT pulse widths → frame → reading
//!
//! Treats the input as 40 pulse widths (one byte each, in microseconds)
//! and checks that assembling, checksumming and decoding never panic and
//! always yield values inside the wire format's range.
//!
//! cargo fuzz run fuzz_sensor_frame

#![no_main]

use climate_reporter::sensors::dht::{FRAME_BITS, assemble, checksum, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < FRAME_BITS {
        return;
    }

    let mut widths = [0u64; FRAME_BITS];
    for (w, &b) in widths.iter_mut().zip(data) {
        *w = u64::from(b);
    }

    let frame = assemble(&widths);
    let _ = checksum(&frame);
    let reading = decode(&frame);

    // 16-bit magnitudes in tenths.
    assert!(reading.humidity >= 0.0 && reading.humidity <= 6553.6);
    assert!(reading.temperature.abs() <= 3276.8);
});
