//! Command-line flags.
//!
//! Flag names follow the original deployment (`--mqtt` for the broker
//! host).  Every default comes from [`crate::config`].

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::config::{
    BaselinePolicy, DEFAULT_BROKER_HOST, DEFAULT_BROKER_PORT, DEFAULT_GPIO_CHIP, DEFAULT_GPIO_PIN,
    DEFAULT_KEEP_ALIVE_SECS, DEFAULT_PERIOD_SECS, DEFAULT_SERIAL_PATH, DEFAULT_SPIKE_THRESHOLD,
    DEFAULT_TOPIC, QoS, ReporterConfig, SensorModel,
};

#[derive(Debug, Parser)]
#[command(
    name = "climate-reporter",
    version,
    about = "Publish changed DHT22/AM2301 readings to an MQTT broker"
)]
pub struct Cli {
    /// MQTT server address
    #[arg(long = "mqtt", default_value = DEFAULT_BROKER_HOST)]
    pub broker_host: String,

    /// MQTT server port
    #[arg(long = "mqtt-port", default_value_t = DEFAULT_BROKER_PORT)]
    pub broker_port: u16,

    /// Topic readings are published to
    #[arg(long, default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Publish QoS level
    #[arg(long, value_enum, default_value = "0")]
    pub qos: QoS,

    /// Set the retain flag on published readings
    #[arg(long)]
    pub retain: bool,

    /// MQTT keep-alive in seconds
    #[arg(long, default_value_t = DEFAULT_KEEP_ALIVE_SECS)]
    pub keep_alive: u64,

    /// GPIO character device
    #[arg(long, default_value = DEFAULT_GPIO_CHIP)]
    pub gpio_chip: PathBuf,

    /// GPIO line the sensor data pin is wired to
    #[arg(long, default_value_t = DEFAULT_GPIO_PIN)]
    pub pin: u32,

    /// Sensor chip variant
    #[arg(long, value_enum, default_value = "dht22")]
    pub sensor: SensorModel,

    /// Sampling period in seconds
    #[arg(long, default_value_t = DEFAULT_PERIOD_SECS)]
    pub period: u64,

    /// Largest accepted upward jump per channel
    #[arg(long, default_value_t = DEFAULT_SPIKE_THRESHOLD)]
    pub spike_threshold: f32,

    /// Baseline handling for rejected spikes
    #[arg(long, value_enum, default_value = "absorb")]
    pub baseline: BaselinePolicy,

    /// File holding the board serial number
    #[arg(long, default_value = DEFAULT_SERIAL_PATH)]
    pub serial_path: PathBuf,

    /// Use this thing id instead of the board serial number
    #[arg(long)]
    pub thing_id: Option<String>,

    /// Log level (RUST_LOG overrides)
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn into_config(self) -> ReporterConfig {
        ReporterConfig {
            broker_host: self.broker_host,
            broker_port: self.broker_port,
            topic: self.topic,
            qos: self.qos,
            retain: self.retain,
            keep_alive_secs: self.keep_alive,
            gpio_chip: self.gpio_chip,
            gpio_pin: self.pin,
            sensor_model: self.sensor,
            spike_threshold: self.spike_threshold,
            baseline_policy: self.baseline,
            period_secs: self.period,
            serial_path: self.serial_path,
            thing_id: self.thing_id,
        }
    }
}
