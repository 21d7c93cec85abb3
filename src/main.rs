//! Climate Reporter: main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  DhtHardware     MqttPublisher   LogEventSink   SystemClock  │
//! │  (SensorPort)    (PublishPort)   (EventSink)    (Clock)      │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          Reporter (pure logic)                     │      │
//! │  │  baseline · ChangeFilter · tick state machine      │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use climate_reporter::adapters::device_id;
use climate_reporter::adapters::hardware;
use climate_reporter::adapters::log_sink::LogEventSink;
use climate_reporter::adapters::mqtt::MqttPublisher;
use climate_reporter::adapters::time::SystemClock;
use climate_reporter::app::service::{CancelToken, Reporter};
use climate_reporter::cli::Cli;

fn main() -> Result<()> {
    // ── 1. Flags + logging ────────────────────────────────────
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    info!("climate-reporter v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = cli.into_config();
    config.validate().context("invalid configuration")?;
    debug!(
        "effective config: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );

    // ── 3. Device identity ────────────────────────────────────
    let thing_id = match config.thing_id.as_deref() {
        Some(explicit) => device_id::parse(explicit).context("invalid --thing-id")?,
        None => device_id::read_serial(&config.serial_path).with_context(|| {
            format!("reading serial number from {}", config.serial_path.display())
        })?,
    };
    info!("Thing ID: {}", thing_id);

    // ── 4. Sensor ─────────────────────────────────────────────
    let mut sensor = hardware::open(&config).context("opening sensor GPIO line")?;

    // ── 5. Broker (fatal on failure) ──────────────────────────
    let mut publisher = MqttPublisher::connect(&config, &thing_id)
        .with_context(|| format!("connecting to MQTT broker {}", config.broker_host))?;

    // ── 6. Loop ───────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut clock = SystemClock::new();
    let cancel = CancelToken::new();
    let mut reporter = Reporter::new(&config, &thing_id);

    info!("Start fetching data from sensor");
    reporter.run(&mut sensor, &mut publisher, &mut sink, &mut clock, &cancel);

    Ok(())
}
