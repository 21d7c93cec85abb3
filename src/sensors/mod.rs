//! Sensor subsystem: the protocol driver and the validating [`SensorReader`].
//!
//! The reader wraps one blocking driver call per tick and turns its result
//! into a tagged [`Sample`].  Failures never escape as errors: the loop
//! only ever sees `Valid` or `Invalid`.

pub mod dht;

use log::debug;

use crate::config::SensorModel;
use crate::error::SensorError;
use crate::reading::{InvalidReason, Reading, Sample};

/// One raw read from a humidity/temperature chip.
pub trait SensorDriver {
    fn read_raw(&mut self) -> Result<Reading, SensorError>;
}

/// Applies the model's validity rules to a driver.
pub struct SensorReader<D> {
    model: SensorModel,
    pin: u32,
    driver: D,
}

impl<D: SensorDriver> SensorReader<D> {
    pub fn new(model: SensorModel, pin: u32, driver: D) -> Self {
        Self { model, pin, driver }
    }

    /// Read once.  No retries; the loop period is the retry cadence.
    ///
    /// A driver error, an all-zero reading, or the model's sentinel on
    /// either channel yields `Invalid`.  The returned reading carries no
    /// identity.
    pub fn read(&mut self) -> Sample {
        match self.driver.read_raw() {
            Ok(reading)
                if is_blank(&reading)
                    || self.model.is_sentinel(reading.temperature)
                    || self.model.is_sentinel(reading.humidity) =>
            {
                debug!(
                    "{:?} on GPIO {}: sentinel reading {:?}",
                    self.model, self.pin, reading
                );
                Sample::Invalid(InvalidReason::Sentinel)
            }
            Ok(reading) => Sample::Valid(reading),
            Err(e) => {
                debug!("{:?} on GPIO {}: {}", self.model, self.pin, e);
                Sample::Invalid(InvalidReason::Driver(e))
            }
        }
    }
}

/// Both channels zero.  An all-zero frame passes the checksum, so it is
/// caught here for every model.
fn is_blank(reading: &Reading) -> bool {
    reading.temperature == 0.0 && reading.humidity == 0.0
}
