//! Irrigation controller — the hexagonal core.
//!
//! [`IrrigationController`] owns the watering schedule, the pump timing
//! model, the resistance history and the hardware ports. Each call to
//! [`tick`](IrrigationController::tick) runs one full cycle:
//!
//! ```text
//!  Idle ──▶ Sampling ──▶ due? ──yes──▶ Pumping ──▶ publish ──▶ Idle
//!                          └──no──────────────────────▲
//! ```
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │   IrrigationController   │
//! ActuatorPort ◀──│ Schedule · Timing · Hist │ ──▶ LiveStatePublisher
//!    ClockPort ──▶└──────────────────────────┘
//! ```
//!
//! The pump hold is a blocking sleep on the control thread, so a pump run
//! can never overlap with sampling or with a second pump run.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use log::{debug, error, info, warn};

use crate::config::IrrigationConfig;
use crate::control::pump_timing::PumpTiming;
use crate::error::{ActuatorError, ConfigError, Result, SensorError};
use crate::history::{HistoryBuffer, NO_DATA};
use crate::schedule::WateringSchedule;
use crate::sensors::conductivity::{conductivity_from_resistance, resistance_from_voltage};

use super::events::AppEvent;
use super::live_state::{self, LiveState, LiveStatePublisher, LiveStateReader};
use super::ports::{ActuatorPort, ClockPort, EventSink, SensorPort};

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Resistance pushed into the history (NaN if the probe failed).
    pub resistance_ohms: f32,
    /// Conductivity published for this tick (NaN if unavailable).
    pub conductivity_s: f32,
    /// Whether this tick ran the pump.
    pub watered: bool,
    /// Probe failure absorbed during this tick, if any.
    pub sensor_fault: Option<SensorError>,
}

// ───────────────────────────────────────────────────────────────
// IrrigationController
// ───────────────────────────────────────────────────────────────

pub struct IrrigationController<H, C> {
    hw: H,
    clock: C,
    schedule: WateringSchedule,
    timing: PumpTiming,
    history: HistoryBuffer,
    sensor_current_amps: f32,
    sample_interval: Duration,
    live: LiveStatePublisher,
    tick_count: u64,
    pump_runs: u64,
}

impl<H, C> IrrigationController<H, C>
where
    H: SensorPort + ActuatorPort,
    C: ClockPort,
{
    /// Construct the controller. The schedule is anchored at `clock.now()`.
    ///
    /// All configuration errors surface here; nothing is validated at
    /// runtime.
    pub fn new(config: &IrrigationConfig, hw: H, clock: C) -> core::result::Result<Self, ConfigError> {
        config.validate()?;

        let schedule = WateringSchedule::new(
            config.watering_hour,
            config.watering_minute,
            clock.now(),
            config.first_watering,
        )?;
        let timing = PumpTiming::from_config(config)?;
        let history = HistoryBuffer::new(config.history_capacity)?;
        let (live, _) = live_state::channel(LiveState::initial(
            schedule.last_watering(),
            schedule.next_watering(),
        ));

        info!(
            "Controller: tick={}ms history={} pump={:.2}s",
            config.sample_interval_ms,
            history.capacity(),
            timing.run_secs()
        );

        Ok(Self {
            hw,
            clock,
            schedule,
            timing,
            history,
            sensor_current_amps: config.sensor_current_amps,
            sample_interval: config.sample_interval(),
            live,
            tick_count: 0,
            pump_runs: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run ticks until `shutdown` is set or the pump faults.
    ///
    /// `shutdown` is checked between ticks; a tick in progress (including
    /// a pump hold) always completes. An [`ActuatorError`] terminates the
    /// loop and is returned to the caller.
    pub fn run(&mut self, sink: &mut impl EventSink, shutdown: &AtomicBool) -> Result<()> {
        sink.emit(&AppEvent::Started {
            next_watering: self.schedule.next_watering(),
        });
        info!(
            "Controller: loop started, next watering {}",
            self.schedule.next_watering()
        );

        while !shutdown.load(Ordering::Acquire) {
            let tick_start = self.clock.now();
            if let Err(e) = self.tick(sink) {
                error!("Controller: pump fault, stopping loop: {}", e);
                sink.emit(&AppEvent::PumpFault(e));
                return Err(e.into());
            }
            self.sleep_until_next_tick(tick_start);
        }

        info!("Controller: shutdown after {} ticks", self.tick_count);
        sink.emit(&AppEvent::Stopped {
            ticks: self.tick_count,
        });
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: sample → history → schedule → pump → publish.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> core::result::Result<TickReport, ActuatorError> {
        self.tick_count += 1;

        // 1. Sample the probe. Failures are absorbed as a NaN sample.
        let sensor_fault = match self.hw.read_voltage() {
            Ok(volts) => {
                self.history
                    .push(resistance_from_voltage(volts, self.sensor_current_amps));
                None
            }
            Err(e) => {
                warn!("Controller: probe read failed: {}", e);
                sink.emit(&AppEvent::SensorFault(e));
                self.history.push(NO_DATA);
                Some(e)
            }
        };

        // 2. Conductivity is derived from the newest resistance.
        let resistance_ohms = self.history.latest();
        let conductivity_s = conductivity_from_resistance(resistance_ohms);
        if sensor_fault.is_none() {
            debug!(
                "Controller: R={:.1}ohm G={:.3e}S",
                resistance_ohms, conductivity_s
            );
            sink.emit(&AppEvent::Sampled {
                resistance_ohms,
                conductivity_s,
            });
        }

        // 3. Schedule check; skipped on a faulted tick.
        let mut watered = false;
        if sensor_fault.is_none() {
            let now = self.clock.now();
            if self.schedule.is_due(now) {
                self.run_pump_cycle(sink)?;
                self.schedule.record_watering(now);
                self.pump_runs += 1;
                watered = true;

                info!(
                    "Controller: watered at {}, next {}",
                    self.schedule.last_watering(),
                    self.schedule.next_watering()
                );
                sink.emit(&AppEvent::WateringFinished {
                    last_watering: self.schedule.last_watering(),
                    next_watering: self.schedule.next_watering(),
                });
            }
        }

        // 4. Publish the completed tick as one value.
        self.live.publish(LiveState {
            latest_conductivity: conductivity_s,
            last_watering: self.schedule.last_watering(),
            next_watering: self.schedule.next_watering(),
        });

        Ok(TickReport {
            resistance_ohms,
            conductivity_s,
            watered,
            sensor_fault,
        })
    }

    // ── Queries ───────────────────────────────────────────────

    /// A read handle for the reporting side.
    pub fn reader(&self) -> LiveStateReader {
        self.live.reader()
    }

    pub fn schedule(&self) -> &WateringSchedule {
        &self.schedule
    }

    pub fn pump_timing(&self) -> &PumpTiming {
        &self.timing
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Total ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Completed pump cycles since construction.
    pub fn pump_runs(&self) -> u64 {
        self.pump_runs
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    /// Pump on, hold for the fixed run time, pump off. No early abort.
    fn run_pump_cycle(&mut self, sink: &mut impl EventSink) -> core::result::Result<(), ActuatorError> {
        let duration = self.timing.run_duration();

        if let Err(e) = self.hw.set_pump(true) {
            // The relay may have latched even though the write reported an error.
            if let Err(off) = self.hw.set_pump(false) {
                error!("Controller: pump release after failed start also failed: {}", off);
            }
            return Err(e);
        }
        sink.emit(&AppEvent::WateringStarted { duration });

        self.clock.sleep(duration);

        self.hw.set_pump(false)
    }

    fn sleep_until_next_tick(&self, tick_start: chrono::NaiveDateTime) {
        // A wall clock stepped backwards reads as zero elapsed.
        let elapsed = (self.clock.now() - tick_start)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let remaining = self.sample_interval.saturating_sub(elapsed);
        if !remaining.is_zero() {
            self.clock.sleep(remaining);
        }
    }
}
