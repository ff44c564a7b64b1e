//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { next_watering } => {
                info!("START | next_watering={}", next_watering);
            }
            AppEvent::Sampled {
                resistance_ohms,
                conductivity_s,
            } => {
                info!(
                    "SAMPLE | R={:.1}ohm | G={:.3e}S",
                    resistance_ohms, conductivity_s
                );
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSOR | {} (publishing NaN)", e);
            }
            AppEvent::WateringStarted { duration } => {
                info!("PUMP | on for {:.2}s", duration.as_secs_f32());
            }
            AppEvent::WateringFinished {
                last_watering,
                next_watering,
            } => {
                info!("PUMP | off | last={} next={}", last_watering, next_watering);
            }
            AppEvent::PumpFault(e) => {
                error!("PUMP | FAULT {}", e);
            }
            AppEvent::Stopped { ticks } => {
                info!("STOP | ticks={}", ticks);
            }
        }
    }
}
