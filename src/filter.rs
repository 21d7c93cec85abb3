//! Change filter.
//!
//! Decides, for each valid sample, whether the tick is a no-op, a publish,
//! or a rejected spike.  The filter is stateless; the baseline it compares
//! against is owned by the [`Reporter`](crate::app::service::Reporter).
//!
//! ## Policy
//!
//! 1. A candidate bit-identical to the baseline is a **no-op**.
//! 2. Otherwise it is published iff both upward deltas are within the
//!    spike threshold and the temperature is non-zero.
//!
//! The bound is one-sided.  Drops of any size pass; only upward jumps
//! beyond the threshold are treated as the sensor's spurious high spikes.

use crate::config::ReporterConfig;
use crate::reading::Reading;

/// Result of comparing a candidate against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Identical to the baseline: no publish, no state change.
    NoOp,
    /// Plausible change: publish and move the baseline.
    Publish,
    /// Implausible spike or zero temperature: do not publish.
    Reject,
}

/// Threshold-based spike filter.
#[derive(Debug, Clone, Copy)]
pub struct ChangeFilter {
    spike_threshold: f32,
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SPIKE_THRESHOLD)
    }
}

impl ChangeFilter {
    pub fn new(spike_threshold: f32) -> Self {
        Self { spike_threshold }
    }

    pub fn from_config(config: &ReporterConfig) -> Self {
        Self::new(config.spike_threshold)
    }

    /// True iff `candidate` is bit-for-bit equal to `last`.
    pub fn is_no_op(&self, last: &Reading, candidate: &Reading) -> bool {
        last.same_bits(candidate)
    }

    /// True iff `candidate` is plausible relative to `last`.
    pub fn should_publish(&self, last: &Reading, candidate: &Reading) -> bool {
        let delta_temp = candidate.temperature - last.temperature;
        let delta_hum = candidate.humidity - last.humidity;

        // A zero temperature is a failed read that slipped past the driver.
        candidate.temperature != 0.0
            && delta_temp <= self.spike_threshold
            && delta_hum <= self.spike_threshold
    }

    /// Combine [`is_no_op`](Self::is_no_op) and
    /// [`should_publish`](Self::should_publish) into one verdict.
    pub fn evaluate(&self, last: &Reading, candidate: &Reading) -> Verdict {
        if self.is_no_op(last, candidate) {
            Verdict::NoOp
        } else if self.should_publish(last, candidate) {
            Verdict::Publish
        } else {
            Verdict::Reject
        }
    }
}
