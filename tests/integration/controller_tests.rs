//! Integration tests for the IrrigationController tick → pump → publish
//! pipeline.
//!
//! These run on the host and drive the controller with a fake clock, so a
//! full day of scheduling runs in microseconds.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gardener::adapters::status::status_json;
use gardener::app::events::AppEvent;
use gardener::app::ports::{ActuatorPort, EventSink};
use gardener::app::service::IrrigationController;
use gardener::config::IrrigationConfig;
use gardener::error::{ActuatorError, ConfigError, Error, SensorError};

use crate::mock_hw::{FakeClock, MockHardware, RecordingSink, at, on_day};

type Controller = IrrigationController<MockHardware, FakeClock>;

fn make_controller(config: &IrrigationConfig, boot: chrono::NaiveDateTime) -> (Controller, FakeClock) {
    let clock = FakeClock::new(boot);
    let hw = MockHardware::new(clock.clone());
    let ctrl = IrrigationController::new(config, hw, clock.clone()).unwrap();
    (ctrl, clock)
}

/// Sets the shutdown flag after a fixed number of samples.
struct StopAfter<'a> {
    inner: RecordingSink,
    remaining: usize,
    flag: &'a AtomicBool,
}

impl EventSink for StopAfter<'_> {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::Sampled { .. } | AppEvent::SensorFault(_)) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.flag.store(true, Ordering::Release);
            }
        }
        self.inner.emit(event);
    }
}

// ── Daily schedule ────────────────────────────────────────────

#[test]
fn boot_before_watering_time_waits_then_waters_once() {
    let (mut ctrl, clock) = make_controller(&IrrigationConfig::default(), at(9, 0));
    let mut sink = RecordingSink::new();

    assert_eq!(ctrl.schedule().next_watering(), at(9, 30));
    assert_eq!(ctrl.schedule().last_watering(), at(9, 0));

    let report = ctrl.tick(&mut sink).unwrap();
    assert!(!report.watered, "09:00 is before the watering time");

    clock.set(at(9, 30));
    let report = ctrl.tick(&mut sink).unwrap();
    assert!(report.watered, "due tick must water");
    assert_eq!(ctrl.schedule().last_watering(), at(9, 30));
    assert_eq!(ctrl.schedule().next_watering(), on_day(2, 9, 30));

    let report = ctrl.tick(&mut sink).unwrap();
    assert!(!report.watered, "no second watering the same day");

    assert_eq!(ctrl.pump_runs(), 1);
    assert_eq!(ctrl.hardware().pump_runs().len(), 1);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::WateringFinished { .. })),
        1
    );
}

#[test]
fn pump_is_held_for_the_computed_run_time() {
    let config = IrrigationConfig {
        first_watering: Some(at(9, 0)),
        ..Default::default()
    };
    let (mut ctrl, clock) = make_controller(&config, at(9, 0));
    let mut sink = RecordingSink::new();

    ctrl.tick(&mut sink).unwrap();

    let runs = ctrl.hardware().pump_runs();
    assert_eq!(runs.len(), 1);
    let (on, off) = runs[0];
    let held_ms = (off - on).num_milliseconds();
    assert!((2799..=2800).contains(&held_ms), "held {held_ms} ms, expected 2.8 s");
    assert_eq!(clock.sleeps(), vec![ctrl.pump_timing().run_duration()]);
    assert!(!ctrl.hardware().is_pump_on());

    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::WateringStarted { duration } if *duration == ctrl.pump_timing().run_duration()
    )));
}

#[test]
fn first_watering_override_is_used_verbatim() {
    let config = IrrigationConfig {
        first_watering: Some(at(14, 5)),
        ..Default::default()
    };
    let (mut ctrl, clock) = make_controller(&config, at(9, 0));
    let mut sink = RecordingSink::new();

    assert_eq!(ctrl.schedule().next_watering(), at(14, 5));

    clock.set(at(14, 4));
    assert!(!ctrl.tick(&mut sink).unwrap().watered);

    clock.set(at(14, 5));
    assert!(ctrl.tick(&mut sink).unwrap().watered);
    // Later days fall back to the configured time of day.
    assert_eq!(ctrl.schedule().next_watering(), on_day(2, 9, 30));
}

#[test]
fn overdue_schedule_catches_up_with_a_single_watering() {
    let (mut ctrl, clock) = make_controller(&IrrigationConfig::default(), at(9, 0));
    let mut sink = RecordingSink::new();

    // Device was unreachable for two days.
    clock.set(on_day(3, 12, 0));
    assert!(ctrl.tick(&mut sink).unwrap().watered);
    assert_eq!(ctrl.schedule().next_watering(), on_day(4, 9, 30));

    clock.set(on_day(3, 12, 1));
    assert!(!ctrl.tick(&mut sink).unwrap().watered);
    assert_eq!(ctrl.pump_runs(), 1);
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn sample_is_stored_as_resistance_and_published_as_conductivity() {
    let (mut ctrl, _clock) = make_controller(&IrrigationConfig::default(), at(9, 0));
    let reader = ctrl.reader();
    let mut sink = RecordingSink::new();

    let report = ctrl.tick(&mut sink).unwrap();

    // 0.2 V / 1 mA = 200 Ω, 1/200 Ω = 5 mS.
    assert!((report.resistance_ohms - 200.0).abs() < 1e-3);
    assert!((report.conductivity_s - 0.005).abs() < 1e-6);
    assert!((ctrl.history().latest() - 200.0).abs() < 1e-3);
    assert!((reader.read().latest_conductivity - 0.005).abs() < 1e-6);
}

#[test]
fn sensor_failure_publishes_nan_and_leaves_schedule_untouched() {
    let clock = FakeClock::new(at(9, 0));
    let hw = MockHardware::new(clock.clone()).with_script([Ok(0.2), Err(SensorError::AdcReadFailed)]);
    let mut ctrl = IrrigationController::new(&IrrigationConfig::default(), hw, clock.clone()).unwrap();
    let reader = ctrl.reader();
    let mut sink = RecordingSink::new();

    ctrl.tick(&mut sink).unwrap();

    clock.set(at(9, 30));
    let report = ctrl.tick(&mut sink).unwrap();
    assert_eq!(report.sensor_fault, Some(SensorError::AdcReadFailed));
    assert!(!report.watered, "faulted tick must not water");
    assert!(ctrl.history().latest().is_nan());
    assert!(reader.read().latest_conductivity.is_nan());
    assert_eq!(ctrl.schedule().next_watering(), at(9, 30));
    assert_eq!(ctrl.schedule().last_watering(), at(9, 0));
    assert!(ctrl.hardware().pump_calls.is_empty());

    // The next healthy tick is still due and waters.
    clock.set(at(9, 30) + chrono::Duration::seconds(10));
    let report = ctrl.tick(&mut sink).unwrap();
    assert!(report.watered);
    assert!(report.conductivity_s.is_finite());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SensorFault(SensorError::AdcReadFailed))),
        1
    );
}

#[test]
fn shorted_probe_publishes_nan_conductivity() {
    let clock = FakeClock::new(at(9, 0));
    let mut hw = MockHardware::new(clock.clone());
    hw.default_volts = 0.0;
    let mut ctrl = IrrigationController::new(&IrrigationConfig::default(), hw, clock).unwrap();
    let reader = ctrl.reader();

    let report = ctrl.tick(&mut RecordingSink::new()).unwrap();
    assert_eq!(report.resistance_ohms, 0.0);
    assert!(report.conductivity_s.is_nan());
    assert!(report.sensor_fault.is_none());

    let body = status_json(&reader.read()).unwrap();
    assert!(body.contains(r#""latest_conductivity":null"#));
}

// ── Actuator faults ───────────────────────────────────────────

#[test]
fn failed_pump_start_releases_pump_and_keeps_schedule() {
    let clock = FakeClock::new(at(9, 0));
    let mut hw = MockHardware::new(clock.clone());
    hw.fail_pump_on = true;
    let config = IrrigationConfig {
        first_watering: Some(at(9, 0)),
        ..Default::default()
    };
    let mut ctrl = IrrigationController::new(&config, hw, clock).unwrap();

    let err = ctrl.tick(&mut RecordingSink::new()).unwrap_err();
    assert_eq!(err, ActuatorError::ActivateFailed);

    let calls = &ctrl.hardware().pump_calls;
    assert_eq!(calls.len(), 2);
    assert!(calls[0].on);
    assert!(!calls[1].on, "failed start must be followed by an off command");
    assert_eq!(ctrl.schedule().next_watering(), at(9, 0));
}

#[test]
fn failed_pump_stop_terminates_run_loop() {
    let clock = FakeClock::new(at(9, 0));
    let mut hw = MockHardware::new(clock.clone());
    hw.fail_pump_off = true;
    let config = IrrigationConfig {
        first_watering: Some(at(9, 0)),
        ..Default::default()
    };
    let mut ctrl = IrrigationController::new(&config, hw, clock).unwrap();
    let shutdown = AtomicBool::new(false);
    let mut sink = RecordingSink::new();

    let result = ctrl.run(&mut sink, &shutdown);

    assert_eq!(result, Err(Error::Actuator(ActuatorError::DeactivateFailed)));
    assert_eq!(ctrl.tick_count(), 1);
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::PumpFault(ActuatorError::DeactivateFailed))
    ));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Stopped { .. })),
        0,
        "a faulted loop does not report a clean stop"
    );
}

// ── Run loop ──────────────────────────────────────────────────

#[test]
fn run_returns_immediately_when_already_shut_down() {
    let (mut ctrl, clock) = make_controller(&IrrigationConfig::default(), at(9, 0));
    let shutdown = AtomicBool::new(true);
    let mut sink = RecordingSink::new();

    ctrl.run(&mut sink, &shutdown).unwrap();

    assert_eq!(ctrl.tick_count(), 0);
    assert!(clock.sleeps().is_empty());
    assert_eq!(
        sink.events,
        vec![
            AppEvent::Started {
                next_watering: at(9, 30)
            },
            AppEvent::Stopped { ticks: 0 },
        ]
    );
}

#[test]
fn run_keeps_tick_cadence_across_a_pump_cycle() {
    let config = IrrigationConfig {
        first_watering: Some(at(9, 0)),
        ..Default::default()
    };
    let (mut ctrl, clock) = make_controller(&config, at(9, 0));
    let shutdown = AtomicBool::new(false);
    let mut sink = StopAfter {
        inner: RecordingSink::new(),
        remaining: 3,
        flag: &shutdown,
    };

    ctrl.run(&mut sink, &shutdown).unwrap();

    assert_eq!(ctrl.tick_count(), 3);
    assert_eq!(ctrl.pump_runs(), 1);

    let sleeps = clock.sleeps();
    // pump hold, rest of tick 1, tick 2, tick 3
    assert_eq!(sleeps.len(), 4);
    assert_eq!(sleeps[0] + sleeps[1], Duration::from_secs(10));
    assert_eq!(sleeps[2], Duration::from_secs(10));
    assert_eq!(sleeps[3], Duration::from_secs(10));
    assert!(matches!(
        sink.inner.events.last(),
        Some(AppEvent::Stopped { ticks: 3 })
    ));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let clock = FakeClock::new(at(9, 0));
    let config = IrrigationConfig {
        history_capacity: 0,
        ..Default::default()
    };
    assert!(IrrigationController::new(&config, MockHardware::new(clock.clone()), clock.clone()).is_err());
}

#[test]
fn unrepresentable_pump_run_time_is_rejected_at_construction() {
    let clock = FakeClock::new(at(9, 0));
    let config = IrrigationConfig {
        pump_flow_l_per_hour: 1.0e-20,
        first_watering: Some(at(9, 0)),
        ..Default::default()
    };
    let result = IrrigationController::new(&config, MockHardware::new(clock.clone()), clock);
    assert!(matches!(
        result,
        Err(ConfigError::ValidationFailed("pump run time out of range"))
    ));
}
