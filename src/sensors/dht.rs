//! DHT22 / AM2301 single-wire protocol driver.
//!
//! Both chips speak the same protocol and frame format:
//!
//! ```text
//!  host  ──┐  ≥1 ms  ┌── release
//!          └─────────┘
//!  sensor            ┌┐ 80 µs low, 80 µs high, then 40 × (50 µs low + data high)
//! ```
//!
//! A data high of ~26 µs is a `0`, ~70 µs is a `1`.  The frame is five
//! bytes: humidity (2), temperature (2, sign in bit 15), checksum (1).
//!
//! ## Timing
//!
//! Pulse widths are measured against the [`Clock`] port by polling the
//! line level, so the driver runs unchanged on a userspace GPIO line and
//! on the scripted lines used in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::trace;

use crate::app::ports::Clock;
use crate::error::SensorError;
use crate::reading::Reading;

use super::SensorDriver;

/// A bidirectional open-drain data line.
///
/// `release` stops driving so the pull-up (or the sensor) sets the level,
/// after which [`InputPin`] reads it.
pub trait OpenDrainLine: InputPin {
    /// Pull the bus low.
    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Stop driving and switch to sampling.
    fn release(&mut self) -> Result<(), Self::Error>;
}

pub const FRAME_LEN: usize = 5;
pub const FRAME_BITS: usize = FRAME_LEN * 8;

/// Start signal length.  Datasheet minimum is 1 ms.
const START_LOW_US: u32 = 3_000;
/// Host pull-up phase before the sensor answers (20–40 µs nominal).
const RELEASE_TIMEOUT_US: u64 = 200;
/// Each half of the 80 µs / 80 µs response.
const RESPONSE_TIMEOUT_US: u64 = 100;
/// Inter-bit low (50 µs nominal).
const BIT_LOW_TIMEOUT_US: u64 = 80;
/// Data high (70 µs nominal for a `1`).
const BIT_HIGH_TIMEOUT_US: u64 = 100;
/// High pulses longer than this are `1` bits.
const ONE_BIT_MIN_US: u64 = 48;

/// Protocol driver over one data line.
pub struct Dht<L, C> {
    line: L,
    clock: C,
}

impl<L, C> Dht<L, C>
where
    L: OpenDrainLine,
    C: Clock + DelayNs,
{
    pub fn new(line: L, clock: C) -> Self {
        Self { line, clock }
    }

    /// Run one full transaction and return the checksum-verified frame.
    pub fn read_frame(&mut self) -> Result<[u8; FRAME_LEN], SensorError> {
        self.line.drive_low().map_err(|_| SensorError::Gpio)?;
        self.clock.delay_us(START_LOW_US);
        self.line.release().map_err(|_| SensorError::Gpio)?;

        // == pull-up phase, then the sensor's 80 µs low / 80 µs high ==
        self.wait_while(true, RELEASE_TIMEOUT_US)?;
        self.wait_while(false, RESPONSE_TIMEOUT_US)?;
        self.wait_while(true, RESPONSE_TIMEOUT_US)?;

        // Capture first, decode later: keep the polling loop tight.
        let mut widths = [0u64; FRAME_BITS];
        for width in &mut widths {
            self.wait_while(false, BIT_LOW_TIMEOUT_US)?;
            *width = self.wait_while(true, BIT_HIGH_TIMEOUT_US)?;
        }

        let frame = assemble(&widths);
        trace!("dht frame {:02x?}", frame);

        if frame[4] == checksum(&frame) {
            Ok(frame)
        } else {
            Err(SensorError::Checksum)
        }
    }

    /// Spin while the line sits at `high`.  Returns how long it stayed there.
    fn wait_while(&mut self, high: bool, timeout_us: u64) -> Result<u64, SensorError> {
        let start = self.clock.now_us();
        loop {
            let level = self.line.is_high().map_err(|_| SensorError::Gpio)?;
            let elapsed = self.clock.now_us().saturating_sub(start);
            if level != high {
                return Ok(elapsed);
            }
            if elapsed > timeout_us {
                return Err(SensorError::Timeout);
            }
        }
    }
}

impl<L, C> SensorDriver for Dht<L, C>
where
    L: OpenDrainLine,
    C: Clock + DelayNs,
{
    fn read_raw(&mut self) -> Result<Reading, SensorError> {
        self.read_frame().map(|frame| decode(&frame))
    }
}

/// Pack 40 high-pulse widths into five bytes, MSB first.
pub fn assemble(widths: &[u64; FRAME_BITS]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    for (i, &width) in widths.iter().enumerate() {
        if width > ONE_BIT_MIN_US {
            frame[i / 8] |= 0x80 >> (i % 8);
        }
    }
    frame
}

/// Low 8 bits of the sum of the four data bytes.
pub fn checksum(frame: &[u8; FRAME_LEN]) -> u8 {
    frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Convert a verified frame into engineering units.
pub fn decode(frame: &[u8; FRAME_LEN]) -> Reading {
    let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;

    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    Reading::new(temperature, humidity)
}
