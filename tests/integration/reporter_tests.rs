//! Integration tests: Reporter tick → filter → publisher / baseline.

use climate_reporter::app::events::ReporterEvent;
use climate_reporter::app::ports::PublishError;
use climate_reporter::app::service::{LoopState, Reporter, TickOutcome};
use climate_reporter::config::{BaselinePolicy, QoS, ReporterConfig};
use climate_reporter::error::SensorError;
use climate_reporter::reading::{InvalidReason, Reading, Sample};

use crate::mock_hw::{RecordingPublisher, RecordingSink, ScriptedSensor};

const SN: &str = "10000000c0ffee42";

fn reporter() -> Reporter {
    Reporter::new(&ReporterConfig::default(), SN)
}

fn reporter_with(policy: BaselinePolicy) -> Reporter {
    let config = ReporterConfig {
        baseline_policy: policy,
        ..ReporterConfig::default()
    };
    Reporter::new(&config, SN)
}

fn valid(t: f32, h: f32) -> Sample {
    Sample::Valid(Reading::new(t, h))
}

fn invalid() -> Sample {
    Sample::Invalid(InvalidReason::Driver(SensorError::Checksum))
}

// ── Documented scenarios ──────────────────────────────────────

#[test]
fn scenario_sequence_from_cold_start() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::new([
        valid(22.0, 45.0),
        valid(23.0, 46.0),
        invalid(),
        valid(23.0, 46.0),
    ]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    // 1. First real reading is a spike relative to {0,0}, but absorbed.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert!(publisher.sent.is_empty());
    assert_eq!(app.baseline(), Reading::new(22.0, 45.0));

    // 2. Small step: published with the thing id.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Published);
    assert_eq!(publisher.sent.len(), 1);
    let v = publisher.sent[0].json();
    assert_eq!(v["thing_id"], SN);
    assert_eq!(v["temperature"].as_f64(), Some(23.0));
    assert_eq!(v["humidity"].as_f64(), Some(46.0));
    assert_eq!(app.baseline(), Reading::new(23.0, 46.0));

    // 3. Invalid read: nothing happens.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Skipped);
    assert_eq!(publisher.sent.len(), 1);
    assert_eq!(app.baseline(), Reading::new(23.0, 46.0));

    // 4. Identical reading: no-op.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Unchanged);
    assert_eq!(publisher.attempts, 1);
    assert_eq!(app.baseline(), Reading::new(23.0, 46.0));

    let stats = app.stats();
    assert_eq!(stats.ticks, 4);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.unchanged, 1);
    assert_eq!(sensor.reads, 4);
}

#[test]
fn publish_uses_configured_topic_and_qos() {
    let config = ReporterConfig {
        topic: "/lab/climat".into(),
        qos: QoS::AtLeastOnce,
        retain: true,
        ..ReporterConfig::default()
    };
    let mut app = Reporter::new(&config, SN);
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();

    app.tick(&mut sensor, &mut publisher, &mut RecordingSink::new());

    let sent = &publisher.sent[0];
    assert_eq!(sent.topic, "/lab/climat");
    assert_eq!(sent.qos, QoS::AtLeastOnce);
    assert!(sent.retain);
}

#[test]
fn default_publish_is_qos0_not_retained() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();

    app.tick(&mut sensor, &mut publisher, &mut RecordingSink::new());

    let sent = &publisher.sent[0];
    assert_eq!(sent.topic, "/sensors/climat");
    assert_eq!(sent.qos, QoS::AtMostOnce);
    assert!(!sent.retain);
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn same_reading_is_never_published_twice_in_a_row() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (3.0, 4.0), (3.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        app.tick(&mut sensor, &mut publisher, &mut sink);
    }

    assert_eq!(publisher.sent.len(), 1);
    assert_eq!(app.stats().unchanged, 2);
}

// ── Invalid samples ───────────────────────────────────────────

#[test]
fn invalid_sample_leaves_state_untouched() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::new([valid(3.0, 4.0), Sample::Invalid(InvalidReason::Sentinel)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut publisher, &mut sink);
    let before = app.baseline();
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Skipped);

    assert_eq!(app.baseline(), before);
    assert_eq!(publisher.attempts, 1);
    assert_eq!(
        sink.last(),
        Some(&ReporterEvent::Skipped(InvalidReason::Sentinel))
    );
    assert_eq!(app.state(), LoopState::Idle);
}

// ── Spike handling ────────────────────────────────────────────

#[test]
fn large_drop_is_published() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (4.0, 5.0), (-20.0, 1.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        app.tick(&mut sensor, &mut publisher, &mut sink);
    }

    assert_eq!(publisher.sent.len(), 3);
    assert_eq!(publisher.sent[2].json()["temperature"].as_f64(), Some(-20.0));
}

#[test]
fn absorbed_spike_becomes_baseline() {
    let mut app = reporter_with(BaselinePolicy::AbsorbRejected);
    // Seed (absorbed from zero), spike, then a reading near the spike.
    let mut sensor = ScriptedSensor::readings(&[(3.0, 40.0), (30.0, 40.0), (31.0, 40.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut publisher, &mut sink);
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert_eq!(
        sink.last(),
        Some(&ReporterEvent::SpikeRejected {
            baseline: Reading::new(3.0, 40.0),
            candidate: Reading::new(30.0, 40.0),
            absorbed: true,
        })
    );
    assert_eq!(app.baseline(), Reading::new(30.0, 40.0));

    // Compared against the absorbed spike, 31 is a small step.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Published);
    assert_eq!(publisher.sent.len(), 1);
}

#[test]
fn keep_previous_holds_baseline_on_spike() {
    let mut app = reporter_with(BaselinePolicy::KeepPrevious);
    let mut sensor = ScriptedSensor::readings(&[(3.0, 40.0), (30.0, 40.0), (30.0, 40.0), (4.0, 41.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut publisher, &mut sink);
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert_eq!(app.baseline(), Reading::new(3.0, 40.0));

    // A repeated spike is rejected again instead of becoming a no-op.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert!(matches!(
        sink.last(),
        Some(ReporterEvent::SpikeRejected { absorbed: false, .. })
    ));

    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Published);
    assert_eq!(publisher.sent.len(), 1);
}

#[test]
fn keep_previous_still_seeds_from_cold_start() {
    let mut app = reporter_with(BaselinePolicy::KeepPrevious);
    let mut sensor = ScriptedSensor::readings(&[(22.0, 45.0), (23.0, 46.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert_eq!(app.baseline(), Reading::new(22.0, 45.0));
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Published);
}

#[test]
fn zero_temperature_is_rejected_even_when_close() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(1.0, 4.0), (0.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut publisher, &mut sink);
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Rejected);
    assert_eq!(publisher.sent.len(), 1);
}

// ── Publish failures ──────────────────────────────────────────

#[test]
fn publish_failure_is_reported_and_baseline_moves() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (3.0, 4.0)]);
    let mut publisher = RecordingPublisher::failing(PublishError::QueueFull);
    let mut sink = RecordingSink::new();

    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::PublishFailed);
    assert_eq!(
        sink.last(),
        Some(&ReporterEvent::PublishFailed {
            reading: Reading::new(3.0, 4.0),
            error: PublishError::QueueFull,
        })
    );
    assert_eq!(app.baseline(), Reading::new(3.0, 4.0));
    assert_eq!(app.stats().publish_failures, 1);

    // No retry: the next identical sample is a no-op.
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Unchanged);
    assert_eq!(publisher.attempts, 1);
}

#[test]
fn loop_keeps_going_after_publish_failure() {
    let mut app = reporter();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (4.0, 5.0)]);
    let mut publisher = RecordingPublisher::failing(PublishError::Disconnected);
    let mut sink = RecordingSink::new();

    app.tick(&mut sensor, &mut publisher, &mut sink);
    publisher.fail_with = None;
    assert_eq!(app.tick(&mut sensor, &mut publisher, &mut sink), TickOutcome::Published);
    assert_eq!(publisher.sent.len(), 1);
}
