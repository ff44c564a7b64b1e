//! Open-loop pump timing model
//!
//! Converts a target delivery volume into a fixed pump run time. Computed
//! once per controller; the run time never changes at runtime.
//!
//! ```text
//! run_duration = pressurize + target_volume / flow_rate
//! ```

use core::time::Duration;

use crate::config::IrrigationConfig;
use crate::error::ConfigError;

const SECS_PER_HOUR: f32 = 3600.0;
/// A hold longer than the daily watering period would overlap the next one.
const MAX_RUN_SECS: f32 = 86_400.0;

/// Pump timing model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PumpTiming {
    flow_l_per_hour: f32,
    pressurize_secs: f32,
    target_volume_l: f32,
    run_secs: f32,
    run_duration: Duration,
}

impl PumpTiming {
    pub fn new(
        flow_l_per_hour: f32,
        pressurize_secs: f32,
        target_volume_l: f32,
    ) -> Result<Self, ConfigError> {
        if !(flow_l_per_hour.is_finite() && flow_l_per_hour > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "pump_flow_l_per_hour must be positive",
            ));
        }
        if !(pressurize_secs.is_finite() && pressurize_secs >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "pump_pressurize_secs must be >= 0",
            ));
        }
        if !(target_volume_l.is_finite() && target_volume_l >= 0.0) {
            return Err(ConfigError::ValidationFailed(
                "target_volume_l must be >= 0",
            ));
        }

        let flow_l_per_sec = flow_l_per_hour / SECS_PER_HOUR;
        let run_secs = pressurize_secs + target_volume_l / flow_l_per_sec;
        if !(run_secs.is_finite() && run_secs <= MAX_RUN_SECS) {
            return Err(ConfigError::ValidationFailed(
                "pump run time out of range",
            ));
        }
        let run_duration = Duration::try_from_secs_f32(run_secs).map_err(|_| {
            ConfigError::ValidationFailed("pump run time out of range")
        })?;

        Ok(Self {
            flow_l_per_hour,
            pressurize_secs,
            target_volume_l,
            run_secs,
            run_duration,
        })
    }

    pub fn from_config(config: &IrrigationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.pump_flow_l_per_hour,
            config.pump_pressurize_secs,
            config.target_volume_l,
        )
    }

    /// How long the pump is held on for one watering cycle.
    pub fn run_duration(&self) -> Duration {
        self.run_duration
    }

    pub fn run_secs(&self) -> f32 {
        self.run_secs
    }

    pub fn flow_l_per_hour(&self) -> f32 {
        self.flow_l_per_hour
    }

    pub fn pressurize_secs(&self) -> f32 {
        self.pressurize_secs
    }

    pub fn target_volume_l(&self) -> f32 {
        self.target_volume_l
    }
}
