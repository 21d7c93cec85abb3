//! Outbound application events.
//!
//! The [`Reporter`](super::service::Reporter) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::reading::{InvalidReason, Reading};

use super::ports::PublishError;

/// Structured events emitted by the reporter core.
#[derive(Debug, Clone, PartialEq)]
pub enum ReporterEvent {
    /// The loop is about to run its first tick.
    Started { thing_id: String, topic: String },

    /// A reading passed the filter and was handed to the broker client.
    Published(Reading),

    /// A reading failed the spike filter.  `absorbed` tells whether it
    /// still became the new baseline.
    SpikeRejected {
        baseline: Reading,
        candidate: Reading,
        absorbed: bool,
    },

    /// The sample equals the baseline.
    Unchanged(Reading),

    /// No usable sample this tick.
    Skipped(InvalidReason),

    /// The broker client refused the publish.
    PublishFailed { reading: Reading, error: PublishError },

    /// The loop observed cancellation and returned.
    Stopped { ticks: u64 },
}
