//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IrrigationController (domain)
//! ```
//!
//! Driven adapters (probe, pump relay, clock, event sinks) implement these
//! traits. The [`IrrigationController`](super::service::IrrigationController)
//! consumes them via generics, so the domain core never touches hardware
//! directly and can be exercised with scripted fakes.

use core::time::Duration;

use chrono::NaiveDateTime;

use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to sample the soil probe.
pub trait SensorPort {
    /// Probe voltage in volts. Failures are recoverable.
    fn read_voltage(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to switch the pump.
///
/// An error from `set_pump(false)` means the pump may still be running
/// and must be treated as fatal by the caller.
pub trait ActuatorPort {
    fn set_pump(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Whether the pump is currently believed to be energised.
    fn is_pump_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: system time → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock time and blocking delays.
///
/// `sleep` is the controller's only suspension primitive: it is used for
/// the inter-tick wait and for the pump hold.
pub trait ClockPort {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
