//! Outbound application events.
//!
//! The [`IrrigationController`](super::service::IrrigationController) emits
//! these through the [`EventSink`](super::ports::EventSink) port. Adapters
//! on the other side decide what to do with them.

use core::time::Duration;

use chrono::NaiveDateTime;

use crate::error::{ActuatorError, SensorError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started.
    Started { next_watering: NaiveDateTime },

    /// A probe sample was taken.
    Sampled {
        resistance_ohms: f32,
        conductivity_s: f32,
    },

    /// The probe could not be read; this tick publishes NaN.
    SensorFault(SensorError),

    /// The pump was switched on and will be held for `duration`.
    WateringStarted { duration: Duration },

    /// The pump cycle completed and the schedule advanced.
    WateringFinished {
        last_watering: NaiveDateTime,
        next_watering: NaiveDateTime,
    },

    /// The pump could not be driven; the loop is terminating.
    PumpFault(ActuatorError),

    /// The control loop exited after a shutdown request.
    Stopped { ticks: u64 },
}
