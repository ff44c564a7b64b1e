//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`ConductivityProbe`] and the [`PumpDriver`], exposing them
//! through [`SensorPort`] and [`ActuatorPort`]. This is the only module in
//! the system that touches actual hardware. On non-espidf targets the
//! probe reads the simulation voltage and the pump drives whatever
//! `OutputPin` it was given.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::pump::PumpDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::conductivity::ConductivityProbe;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P> {
    probe: ConductivityProbe,
    pump: PumpDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(probe: ConductivityProbe, pump: PumpDriver<P>) -> Self {
        Self { probe, pump }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_voltage(&mut self) -> Result<f32, SensorError> {
        self.probe.read_volts()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.pump.set(on)
    }

    fn is_pump_on(&self) -> bool {
        self.pump.is_running()
    }
}
