//! Reporter service: the hexagonal core.
//!
//! [`Reporter`] owns the baseline reading and the change filter.  It
//! exposes a hardware-agnostic per-tick API; all I/O flows through port
//! traits injected at call sites, making the loop testable with mocks.
//!
//! ```text
//!   SensorPort ──▶ ┌─────────────────────────┐ ──▶ PublishPort
//!                  │        Reporter         │
//!        Clock ◀──│  baseline · ChangeFilter │ ──▶ EventSink
//!                  └─────────────────────────┘
//! ```
//!
//! ## Tick state machine
//!
//! ```text
//!  Idle ─▶ Sampling ─┬─▶ Skipping ───────────────────────┐
//!                    └─▶ Evaluating ─┬─▶ Publishing ─────┤
//!                                    ├─▶ UpdatingOnly ───┤
//!                                    └─▶ (no-op) ────────┴─▶ Idle
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;

use log::{debug, info};

use crate::config::{BaselinePolicy, QoS, ReporterConfig};
use crate::filter::{ChangeFilter, Verdict};
use crate::reading::{Reading, Sample};

use super::events::ReporterEvent;
use super::ports::{Clock, EventSink, PublishError, PublishPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Loop state and outcomes
// ───────────────────────────────────────────────────────────────

/// Where the loop currently is within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Sleeping between ticks.
    Idle,
    /// Blocked in the sensor read.
    Sampling,
    /// Comparing the candidate against the baseline.
    Evaluating,
    /// Handing a payload to the broker client.
    Publishing,
    /// Moving the baseline without publishing.
    UpdatingOnly,
    /// Discarding an invalid sample.
    Skipping,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Published,
    PublishFailed,
    Rejected,
    Unchanged,
    Skipped,
}

/// Running counters, one per [`TickOutcome`] plus the tick total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterStats {
    pub ticks: u64,
    pub published: u64,
    pub publish_failures: u64,
    pub rejected: u64,
    pub unchanged: u64,
    pub skipped: u64,
}

// ───────────────────────────────────────────────────────────────
// Cancellation
// ───────────────────────────────────────────────────────────────

/// Shared stop flag for [`Reporter::run`].  Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// Reporter
// ───────────────────────────────────────────────────────────────

/// The sample → filter → publish loop.
pub struct Reporter {
    thing_id: String,
    topic: String,
    qos: QoS,
    retain: bool,
    period: Duration,
    filter: ChangeFilter,
    policy: BaselinePolicy,
    /// Last accepted reading.  Starts at all-zero.
    baseline: Reading,
    /// Whether `baseline` has ever been replaced by a real sample.
    seeded: bool,
    state: LoopState,
    stats: ReporterStats,
}

impl Reporter {
    /// Build the loop from validated configuration and the resolved identity.
    pub fn new(config: &ReporterConfig, thing_id: &str) -> Self {
        Self {
            thing_id: thing_id.to_string(),
            topic: config.topic.clone(),
            qos: config.qos,
            retain: config.retain,
            period: Duration::from_secs(config.period_secs),
            filter: ChangeFilter::from_config(config),
            policy: config.baseline_policy,
            baseline: Reading::default(),
            seeded: false,
            state: LoopState::Idle,
            stats: ReporterStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the loop to the sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&ReporterEvent::Started {
            thing_id: self.thing_id.clone(),
            topic: self.topic.clone(),
        });
        info!(
            "Reporter started: thing_id={} topic={} period={}s",
            self.thing_id,
            self.topic,
            self.period.as_secs()
        );
    }

    /// Tick, sleep, repeat until `cancel` fires.
    ///
    /// The token is checked before every tick and again before sleeping, so
    /// a cancel raised during a tick never costs a full period.
    pub fn run(
        &mut self,
        sensor: &mut impl SensorPort,
        publisher: &mut impl PublishPort,
        sink: &mut impl EventSink,
        clock: &mut impl Clock,
        cancel: &CancelToken,
    ) {
        self.start(sink);

        while !cancel.is_cancelled() {
            self.tick(sensor, publisher, sink);
            if cancel.is_cancelled() {
                break;
            }
            clock.sleep(self.period);
        }

        sink.emit(&ReporterEvent::Stopped {
            ticks: self.stats.ticks,
        });
        info!("Reporter stopped after {} ticks", self.stats.ticks);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: sample → evaluate → publish and/or move the baseline.
    ///
    /// Nothing inside a tick is fatal.  Invalid samples are skipped without
    /// touching state; publish failures are reported and the baseline still
    /// moves, because the tick was not a no-op.
    pub fn tick(
        &mut self,
        sensor: &mut impl SensorPort,
        publisher: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.stats.ticks += 1;

        // 1. Sample
        self.state = LoopState::Sampling;
        let candidate = match sensor.sample() {
            Sample::Valid(reading) => reading,
            Sample::Invalid(reason) => {
                self.state = LoopState::Skipping;
                self.stats.skipped += 1;
                sink.emit(&ReporterEvent::Skipped(reason));
                self.state = LoopState::Idle;
                return TickOutcome::Skipped;
            }
        };

        // 2. Evaluate against the baseline
        self.state = LoopState::Evaluating;
        let outcome = match self.filter.evaluate(&self.baseline, &candidate) {
            Verdict::NoOp => {
                self.stats.unchanged += 1;
                sink.emit(&ReporterEvent::Unchanged(candidate));
                TickOutcome::Unchanged
            }
            Verdict::Publish => {
                self.state = LoopState::Publishing;
                let outcome = self.publish(candidate, publisher, sink);
                self.accept(candidate);
                outcome
            }
            Verdict::Reject => {
                // An unseeded baseline is the zero start value, never a real
                // reading, so even `KeepPrevious` lets the first sample in.
                let absorbed = self.policy == BaselinePolicy::AbsorbRejected || !self.seeded;
                let baseline = self.baseline;
                if absorbed {
                    self.state = LoopState::UpdatingOnly;
                    self.accept(candidate);
                }
                self.stats.rejected += 1;
                sink.emit(&ReporterEvent::SpikeRejected {
                    baseline,
                    candidate,
                    absorbed,
                });
                TickOutcome::Rejected
            }
        };

        self.state = LoopState::Idle;
        outcome
    }

    // ── Queries ───────────────────────────────────────────────

    /// The reading the next candidate is compared against.
    pub fn baseline(&self) -> Reading {
        self.baseline
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> ReporterStats {
        self.stats
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    // ── Internal ──────────────────────────────────────────────

    fn accept(&mut self, reading: Reading) {
        self.baseline = reading;
        self.seeded = true;
    }

    fn publish(
        &mut self,
        reading: Reading,
        publisher: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        let result = reading
            .to_payload(&self.thing_id)
            .map_err(|_| PublishError::Encode)
            .and_then(|payload| publisher.publish(&self.topic, &payload, self.qos, self.retain));

        match result {
            Ok(()) => {
                self.stats.published += 1;
                sink.emit(&ReporterEvent::Published(reading));
                TickOutcome::Published
            }
            Err(error) => {
                self.stats.publish_failures += 1;
                debug!("publish of {:?} failed: {}", reading, error);
                sink.emit(&ReporterEvent::PublishFailed { reading, error });
                TickOutcome::PublishFailed
            }
        }
    }
}
