//! Water pump relay driver.
//!
//! On/off control of a single relay line through any
//! [`embedded_hal::digital::OutputPin`]. Relay boards differ in polarity,
//! so the driver maps "on" to a high or low level per `active_low`.
//!
//! ## Safety contract
//!
//! The line is forced to the off level at construction. The driver only
//! records the pump as running once the pin write succeeded, and only
//! records it as stopped once the release succeeded, so `is_running()`
//! stays pessimistic when the hardware misbehaves.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `P` is an `esp_idf_hal` `PinDriver` in output mode.
//! On host/test: any in-memory `OutputPin` implementation.

use embedded_hal::digital::OutputPin;
use log::{error, info};

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Stopped,
    Running,
}

pub struct PumpDriver<P> {
    pin: P,
    active_low: bool,
    state: PumpState,
}

impl<P: OutputPin> PumpDriver<P> {
    /// Take ownership of `pin` and drive it to the off level.
    pub fn new(pin: P, active_low: bool) -> Result<Self, ActuatorError> {
        let mut pump = Self {
            pin,
            active_low,
            // Assume the worst until the off level is confirmed.
            state: PumpState::Running,
        };
        pump.stop()?;
        info!(
            "PumpDriver: ready (active_{})",
            if active_low { "low" } else { "high" }
        );
        Ok(pump)
    }

    pub fn start(&mut self) -> Result<(), ActuatorError> {
        self.write_level(true).map_err(|()| {
            error!("PumpDriver: failed to energise relay");
            ActuatorError::ActivateFailed
        })?;
        self.state = PumpState::Running;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.write_level(false).map_err(|()| {
            error!("PumpDriver: failed to release relay");
            ActuatorError::DeactivateFailed
        })?;
        self.state = PumpState::Stopped;
        Ok(())
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on { self.start() } else { self.stop() }
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, PumpState::Running)
    }

    fn write_level(&mut self, on: bool) -> Result<(), ()> {
        let high = on != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ())
    }
}
