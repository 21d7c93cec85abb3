//! Reporter configuration parameters
//!
//! All tunable parameters for the climate reporter.  Values come from the
//! command line (see [`crate::cli`]); every field has a default matching the
//! original deployment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BROKER_HOST: &str = "localhost";
pub const DEFAULT_BROKER_PORT: u16 = 1883;
pub const DEFAULT_TOPIC: &str = "/sensors/climat";
pub const DEFAULT_GPIO_CHIP: &str = "/dev/gpiochip0";
pub const DEFAULT_GPIO_PIN: u32 = 4;
pub const DEFAULT_PERIOD_SECS: u64 = 2;
pub const DEFAULT_SPIKE_THRESHOLD: f32 = 5.0;
pub const DEFAULT_SERIAL_PATH: &str = "/proc/device-tree/serial-number";
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

/// Highest line offset accepted for `gpio_pin`.
const MAX_GPIO_PIN: u32 = 511;

/// Supported single-wire humidity/temperature chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SensorModel {
    /// Aosong DHT22 (AM2302).
    Dht22,
    /// Aosong AM2301 (wired DHT21).
    Am2301,
}

impl SensorModel {
    /// Whether a decoded channel value is this model's "no data" marker.
    ///
    /// The two deployments disagree: DHT22 units report `-1`, AM2301 units
    /// report `0`.  Kept per-model on purpose.
    ///
    /// The value is compared after decoding, so a genuine DHT22 reading of
    /// exactly -1.0 °C (frame bytes `0x80 0x0A`) is dropped as well.
    pub fn is_sentinel(self, value: f32) -> bool {
        match self {
            Self::Dht22 => value == -1.0,
            Self::Am2301 => value == 0.0,
        }
    }
}

/// What happens to the baseline when a spike is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BaselinePolicy {
    /// The rejected reading becomes the new baseline (original behaviour).
    #[value(name = "absorb")]
    AbsorbRejected,
    /// The baseline stays on the last published reading.
    #[value(name = "keep")]
    KeepPrevious,
}

/// MQTT delivery guarantee for published readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QoS {
    #[value(name = "0")]
    AtMostOnce,
    #[value(name = "1")]
    AtLeastOnce,
    #[value(name = "2")]
    ExactlyOnce,
}

/// Core reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    // --- Broker ---
    /// Broker host name or address
    pub broker_host: String,
    /// Broker TCP port
    pub broker_port: u16,
    /// Topic every reading is published to
    pub topic: String,
    /// Publish QoS
    pub qos: QoS,
    /// Retain flag on published readings
    pub retain: bool,
    /// MQTT keep-alive (seconds)
    pub keep_alive_secs: u64,

    // --- Sensor ---
    /// GPIO character device the sensor is wired to
    pub gpio_chip: PathBuf,
    /// Line offset of the sensor data pin
    pub gpio_pin: u32,
    /// Sensor chip variant
    pub sensor_model: SensorModel,

    // --- Filtering ---
    /// Largest accepted upward jump per channel
    pub spike_threshold: f32,
    /// Baseline handling for rejected spikes
    pub baseline_policy: BaselinePolicy,

    // --- Timing ---
    /// Sampling period (seconds)
    pub period_secs: u64,

    // --- Identity ---
    /// File holding the board serial number
    pub serial_path: PathBuf,
    /// Explicit thing id; overrides `serial_path` when set
    pub thing_id: Option<String>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            // Broker
            broker_host: DEFAULT_BROKER_HOST.to_string(),
            broker_port: DEFAULT_BROKER_PORT,
            topic: DEFAULT_TOPIC.to_string(),
            qos: QoS::AtMostOnce,
            retain: false,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,

            // Sensor
            gpio_chip: PathBuf::from(DEFAULT_GPIO_CHIP),
            gpio_pin: DEFAULT_GPIO_PIN,
            sensor_model: SensorModel::Dht22,

            // Filtering
            spike_threshold: DEFAULT_SPIKE_THRESHOLD,
            baseline_policy: BaselinePolicy::AbsorbRejected,

            // Timing
            period_secs: DEFAULT_PERIOD_SECS,

            // Identity
            serial_path: PathBuf::from(DEFAULT_SERIAL_PATH),
            thing_id: None,
        }
    }
}

impl ReporterConfig {
    /// Reject values the reporter cannot run with.  Never clamps.
    pub fn validate(&self) -> Result<()> {
        if self.broker_host.trim().is_empty() {
            return Err(Error::Config("broker_host must not be empty"));
        }
        if self.broker_port == 0 {
            return Err(Error::Config("broker_port must be non-zero"));
        }
        if self.topic.is_empty() {
            return Err(Error::Config("topic must not be empty"));
        }
        if self.period_secs == 0 {
            return Err(Error::Config("period_secs must be at least 1"));
        }
        if !self.spike_threshold.is_finite() || self.spike_threshold <= 0.0 {
            return Err(Error::Config("spike_threshold must be a positive number"));
        }
        if self.gpio_pin > MAX_GPIO_PIN {
            return Err(Error::Config("gpio_pin out of range"));
        }
        if self.keep_alive_secs < 5 {
            return Err(Error::Config("keep_alive_secs must be at least 5"));
        }
        Ok(())
    }
}
