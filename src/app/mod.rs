//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the planter: the tick
//! cycle, the pump sequence, and the published live state. All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod live_state;
pub mod ports;
pub mod service;
