//! Reading value object and the tagged sample result.
//!
//! A [`Reading`] carries only the two measured channels.  The thing id is
//! attached when the payload is built, never at read time.

use serde::Serialize;

use crate::error::SensorError;

/// One temperature/humidity pair.  `Default` is the all-zero start value
/// the baseline begins from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity, percent.
    pub humidity: f32,
}

impl Reading {
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// Bit-for-bit equality on both channels.
    pub fn same_bits(&self, other: &Self) -> bool {
        self.temperature.to_bits() == other.temperature.to_bits()
            && self.humidity.to_bits() == other.humidity.to_bits()
    }

    /// Encode the wire payload: `{"thing_id":..,"temperature":..,"humidity":..}`.
    pub fn to_payload(&self, thing_id: &str) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&Payload {
            thing_id,
            temperature: self.temperature,
            humidity: self.humidity,
        })
    }
}

/// Field names and order are what broker-side consumers parse.
#[derive(Serialize)]
struct Payload<'a> {
    thing_id: &'a str,
    temperature: f32,
    humidity: f32,
}

/// Why a tick produced no usable sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The driver call failed.
    Driver(SensorError),
    /// The driver returned the model's "no data" value on a channel.
    Sentinel,
}

impl core::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Driver(e) => write!(f, "{e}"),
            Self::Sentinel => write!(f, "sentinel value"),
        }
    }
}

/// Outcome of one sensor read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Valid(Reading),
    Invalid(InvalidReason),
}
