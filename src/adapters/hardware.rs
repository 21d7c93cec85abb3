//! Hardware adapter: bridges the real sensor to the domain's [`SensorPort`].
//!
//! Builds the GPIO line, the protocol driver and the validating reader
//! from configuration.  This is the only module that opens hardware.

use log::{error, info};

use crate::adapters::gpio::CdevLine;
use crate::adapters::time::SystemClock;
use crate::app::ports::SensorPort;
use crate::config::ReporterConfig;
use crate::error::{Result, SensorError};
use crate::reading::Sample;
use crate::sensors::dht::Dht;
use crate::sensors::{SensorDriver, SensorReader};

/// The production sensor stack.
pub type DhtHardware = SensorReader<Dht<CdevLine, SystemClock>>;

/// Open the configured line and wrap it in a reader.
pub fn open(config: &ReporterConfig) -> Result<DhtHardware> {
    let line = CdevLine::open(&config.gpio_chip, config.gpio_pin).map_err(|e| {
        error!(
            "cannot open GPIO {} on {}: {}",
            config.gpio_pin,
            config.gpio_chip.display(),
            e
        );
        SensorError::Gpio
    })?;
    info!(
        "{:?} sensor on {} line {}",
        config.sensor_model,
        config.gpio_chip.display(),
        config.gpio_pin
    );
    let driver = Dht::new(line, SystemClock::new());
    Ok(SensorReader::new(config.sensor_model, config.gpio_pin, driver))
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: SensorDriver> SensorPort for SensorReader<D> {
    fn sample(&mut self) -> Sample {
        self.read()
    }
}
