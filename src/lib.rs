//! Gardener firmware library.
//!
//! Unattended irrigation for one planter: a conductivity probe is sampled
//! on a fixed tick, the readings land in a windowed history, and a pump
//! runs once a day at a configured wall-clock time.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod pins;
pub mod schedule;

pub mod adapters;
pub mod control;
pub mod drivers;
pub mod sensors;
