//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                  |
//! |------------|--------------|------------------------------|
//! | `hardware` | SensorPort   | ESP32 ADC (probe voltage)    |
//! |            | ActuatorPort | GPIO (pump relay)            |
//! | `log_sink` | EventSink    | Serial log output            |
//! | `status`   | —            | HTTP `GET /` (live state)    |
//! | `time`     | ClockPort    | System wall clock            |

pub mod hardware;
pub mod log_sink;
pub mod status;
pub mod time;
