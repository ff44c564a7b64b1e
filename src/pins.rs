//! GPIO / peripheral pin assignments for the planter board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

// GPIO 21 drives the relay (polarity set by `pump_active_low`). The HAL hands
// it out as the typed `peripherals.pins.gpio21`, so there is no number here.

// ---------------------------------------------------------------------------
// Conductivity probe — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Probe voltage across the soil, via the constant-current source.
/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const PROBE_ADC_CHANNEL: u32 = 3;
/// Full-scale voltage of the ADC at 12 dB attenuation.
pub const PROBE_ADC_FULL_SCALE_V: f32 = 3.1;
/// 12-bit ADC.
pub const PROBE_ADC_MAX_RAW: u16 = 4095;
