//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Reporter (domain)
//! ```
//!
//! Driven adapters (sensor, broker client, event sinks, clock) implement
//! these traits.  The [`Reporter`](super::service::Reporter) consumes them
//! via generics, so the domain core never touches hardware or sockets.

use core::time::Duration;

use crate::config::QoS;
use crate::reading::Sample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Take one blocking sample.  Never retries internally.
    fn sample(&mut self) -> Sample;
}

// ───────────────────────────────────────────────────────────────
// Publish port (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget publish.  Connection management is entirely the
/// adapter's business; the domain assumes a connected handle.
pub trait PublishPort {
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ReporterEvent`](super::events::ReporterEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ReporterEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ system time)
// ───────────────────────────────────────────────────────────────

/// Monotonic time and blocking sleep.
///
/// The sensor driver uses `now_us` to measure pulse widths; the main loop
/// uses `sleep` between ticks.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin.
    fn now_us(&mut self) -> u64;

    /// Block the calling thread.
    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PublishPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The client's outgoing request queue is full.
    QueueFull,
    /// The client has been shut down.
    Disconnected,
    /// The payload could not be encoded.
    Encode,
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull => write!(f, "request queue full"),
            Self::Disconnected => write!(f, "client disconnected"),
            Self::Encode => write!(f, "payload encoding failed"),
        }
    }
}
