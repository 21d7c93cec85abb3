//! Integration tests: `Reporter::run` lifecycle, pacing and cancellation.

use std::time::Duration;

use climate_reporter::app::events::ReporterEvent;
use climate_reporter::app::service::{CancelToken, Reporter};
use climate_reporter::config::ReporterConfig;

use crate::mock_hw::{FakeClock, RecordingPublisher, RecordingSink, ScriptedSensor};

const SN: &str = "10000000c0ffee42";

#[test]
fn run_sleeps_one_period_between_ticks() {
    let mut app = Reporter::new(&ReporterConfig::default(), SN);
    let cancel = CancelToken::new();
    let mut clock = FakeClock::cancelling_after(3, &cancel);
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (4.0, 5.0), (5.0, 6.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.run(&mut sensor, &mut publisher, &mut sink, &mut clock, &cancel);

    // Cancelled inside the third sleep; the loop exits before another tick.
    assert_eq!(clock.sleeps, vec![Duration::from_secs(2); 3]);
    assert_eq!(sensor.reads, 3);
    assert_eq!(app.stats().ticks, 3);
    assert_eq!(publisher.sent.len(), 3);
}

#[test]
fn run_uses_configured_period() {
    let config = ReporterConfig {
        period_secs: 8,
        ..ReporterConfig::default()
    };
    let mut app = Reporter::new(&config, SN);
    let cancel = CancelToken::new();
    let mut clock = FakeClock::cancelling_after(1, &cancel);

    app.run(
        &mut ScriptedSensor::new([]),
        &mut RecordingPublisher::new(),
        &mut RecordingSink::new(),
        &mut clock,
        &cancel,
    );

    assert_eq!(clock.sleeps, vec![Duration::from_secs(8)]);
    assert_eq!(clock.now_us, 8_000_000);
}

#[test]
fn run_brackets_ticks_with_started_and_stopped() {
    let mut app = Reporter::new(&ReporterConfig::default(), SN);
    let cancel = CancelToken::new();
    let mut clock = FakeClock::cancelling_after(2, &cancel);
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0), (3.0, 4.0)]);
    let mut sink = RecordingSink::new();

    app.run(&mut sensor, &mut RecordingPublisher::new(), &mut sink, &mut clock, &cancel);

    assert_eq!(
        sink.events.first(),
        Some(&ReporterEvent::Started {
            thing_id: SN.to_string(),
            topic: "/sensors/climat".to_string(),
        })
    );
    assert_eq!(sink.last(), Some(&ReporterEvent::Stopped { ticks: 2 }));
    assert!(matches!(sink.events[1], ReporterEvent::Published(_)));
    assert!(matches!(sink.events[2], ReporterEvent::Unchanged(_)));
    assert_eq!(sink.events.len(), 4);
}

#[test]
fn pre_cancelled_token_runs_no_ticks() {
    let mut app = Reporter::new(&ReporterConfig::default(), SN);
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut clock = FakeClock::new();
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.run(&mut sensor, &mut publisher, &mut sink, &mut clock, &cancel);

    assert_eq!(sensor.reads, 0);
    assert!(clock.sleeps.is_empty());
    assert!(publisher.sent.is_empty());
    assert_eq!(sink.events.len(), 2);
    assert_eq!(sink.last(), Some(&ReporterEvent::Stopped { ticks: 0 }));
}

#[test]
fn sensor_outage_does_not_stop_the_loop() {
    let mut app = Reporter::new(&ReporterConfig::default(), SN);
    let cancel = CancelToken::new();
    let mut clock = FakeClock::cancelling_after(5, &cancel);
    // Script runs dry after one sample; every later read times out.
    let mut sensor = ScriptedSensor::readings(&[(3.0, 4.0)]);
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();

    app.run(&mut sensor, &mut publisher, &mut sink, &mut clock, &cancel);

    let stats = app.stats();
    assert_eq!(stats.ticks, 5);
    assert_eq!(stats.published, 1);
    assert_eq!(stats.skipped, 4);
    assert_eq!(app.baseline().temperature, 3.0);
}

#[test]
fn cancel_from_another_thread_stops_run() {
    let mut app = Reporter::new(&ReporterConfig::default(), SN);
    let cancel = CancelToken::new();
    let remote = cancel.clone();
    let handle = std::thread::spawn(move || remote.cancel());
    handle.join().unwrap();

    let mut clock = FakeClock::new();
    app.run(
        &mut ScriptedSensor::new([]),
        &mut RecordingPublisher::new(),
        &mut RecordingSink::new(),
        &mut clock,
        &cancel,
    );
    assert_eq!(app.stats().ticks, 0);
}
