//! System configuration parameters
//!
//! All tunable parameters for the gardener controller. Values are fixed at
//! construction time; there is no runtime reconfiguration. The device build
//! can override the defaults with a JSON document (see [`IrrigationConfig::from_json`]).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::control::pump_timing::PumpTiming;
use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationConfig {
    // --- Sampling ---
    /// Controller tick period (milliseconds)
    pub sample_interval_ms: u32,
    /// Number of resistance samples retained in the history window
    pub history_capacity: usize,
    /// Excitation current driven through the probe (amperes)
    pub sensor_current_amps: f32,

    // --- Schedule ---
    /// Daily watering hour (0-23, local time)
    pub watering_hour: u8,
    /// Daily watering minute (0-59)
    pub watering_minute: u8,
    /// One-time override for the first watering after deployment.
    pub first_watering: Option<NaiveDateTime>,

    // --- Pump ---
    /// Pump delivery rate in litres/hour
    pub pump_flow_l_per_hour: f32,
    /// Time for the line to pressurise before water reaches the planter (seconds)
    pub pump_pressurize_secs: f32,
    /// Volume delivered per watering cycle (litres)
    pub target_volume_l: f32,
    /// Pump relay is switched on by driving the line low
    pub pump_active_low: bool,
}

impl Default for IrrigationConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_interval_ms: 10_000, // 0.1 Hz
            history_capacity: 360,      // one hour at the default cadence
            sensor_current_amps: 0.001,

            // Schedule
            watering_hour: 9,
            watering_minute: 30,
            first_watering: None,

            // Pump
            pump_flow_l_per_hour: 400.0,
            pump_pressurize_secs: 1.0,
            target_volume_l: 0.2,
            pump_active_low: false,
        }
    }
}

impl IrrigationConfig {
    /// Parse a JSON overrides document. Missing fields keep their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(doc).map_err(|e| {
            log::warn!("config: rejecting document: {}", e);
            ConfigError::Malformed
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(100..=3_600_000).contains(&self.sample_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_ms must be 100–3600000",
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ValidationFailed(
                "history_capacity must be > 0",
            ));
        }
        if !(self.sensor_current_amps.is_finite() && self.sensor_current_amps > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "sensor_current_amps must be positive",
            ));
        }
        if self.watering_hour > 23 {
            return Err(ConfigError::ValidationFailed("watering_hour must be 0–23"));
        }
        if self.watering_minute > 59 {
            return Err(ConfigError::ValidationFailed(
                "watering_minute must be 0–59",
            ));
        }
        if !(self.pump_flow_l_per_hour.is_finite() && self.pump_flow_l_per_hour > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "pump_flow_l_per_hour must be positive",
            ));
        }
        if !(self.pump_pressurize_secs.is_finite() && self.pump_pressurize_secs >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "pump_pressurize_secs must be >= 0",
            ));
        }
        if !(self.target_volume_l.is_finite() && self.target_volume_l >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "target_volume_l must be >= 0",
            ));
        }
        // The derived hold time must also be representable.
        PumpTiming::from_config(self)?;
        Ok(())
    }

    /// Tick period as a [`Duration`](std::time::Duration).
    pub fn sample_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.sample_interval_ms))
    }
}
