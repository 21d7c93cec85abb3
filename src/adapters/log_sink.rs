//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured reporter events through
//! the `log` facade (stderr via `env_logger` in the binary).

use log::{debug, info, warn};

use crate::app::events::ReporterEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ReporterEvent`].
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ReporterEvent) {
        match event {
            ReporterEvent::Started { thing_id, topic } => {
                info!("START | thing_id={} topic={}", thing_id, topic);
            }
            ReporterEvent::Published(r) => {
                info!(
                    "PUB | T={:.1}\u{00b0}C RH={:.1}%",
                    r.temperature, r.humidity
                );
            }
            ReporterEvent::SpikeRejected {
                baseline,
                candidate,
                absorbed,
            } => {
                info!(
                    "SPIKE | T={:.1}->{:.1}\u{00b0}C RH={:.1}->{:.1}% | baseline {}",
                    baseline.temperature,
                    candidate.temperature,
                    baseline.humidity,
                    candidate.humidity,
                    if *absorbed { "moved" } else { "kept" },
                );
            }
            ReporterEvent::Unchanged(r) => {
                debug!("SAME | T={:.1}\u{00b0}C RH={:.1}%", r.temperature, r.humidity);
            }
            ReporterEvent::Skipped(reason) => {
                debug!("SKIP | {}", reason);
            }
            ReporterEvent::PublishFailed { reading, error } => {
                warn!(
                    "PUBFAIL | T={:.1}\u{00b0}C RH={:.1}% | {}",
                    reading.temperature, reading.humidity, error
                );
            }
            ReporterEvent::Stopped { ticks } => {
                info!("STOP | ticks={}", ticks);
            }
        }
    }
}
