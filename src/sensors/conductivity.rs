//! Soil conductivity probe driver.
//!
//! A constant current is driven through two electrodes in the soil and
//! the voltage across them is sampled on an ADC channel. Ohm's law gives
//! the soil resistance; conductivity is its reciprocal.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU32` (f32 bits) for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_PROBE_VOLTS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_probe_volts(volts: f32) {
    SIM_PROBE_VOLTS.store(volts.to_bits(), Ordering::Relaxed);
}

/// Soil resistance (ohms) for a probe `voltage` at `current` amps.
pub fn resistance_from_voltage(voltage: f32, current: f32) -> f32 {
    voltage / current
}

/// Conductivity (siemens) for a given resistance.
///
/// A zero resistance has no finite conductivity and maps to NaN.
pub fn conductivity_from_resistance(resistance: f32) -> f32 {
    if resistance == 0.0 {
        return f32::NAN;
    }
    1.0 / resistance
}

pub struct ConductivityProbe {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl ConductivityProbe {
    pub fn new(adc_channel: u32) -> Self {
        Self { adc_channel }
    }

    /// Sample the probe voltage.
    ///
    /// Negative or non-finite values are rejected as out of range.
    pub fn read_volts(&mut self) -> Result<f32, SensorError> {
        let volts = self.read_adc_volts()?;
        if !volts.is_finite() || volts < 0.0 {
            return Err(SensorError::OutOfRange);
        }
        Ok(volts)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc_volts(&self) -> Result<f32, SensorError> {
        let raw = hw_init::adc1_read(self.adc_channel).map_err(|rc| {
            log::warn!("probe: ADC1 CH{} read failed (rc={})", self.adc_channel, rc);
            SensorError::AdcReadFailed
        })?;
        Ok(hw_init::probe_raw_to_volts(raw))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc_volts(&self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_PROBE_VOLTS.load(Ordering::Relaxed)))
    }
}
