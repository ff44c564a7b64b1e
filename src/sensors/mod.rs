//! Sensor subsystem.
//!
//! The planter has a single soil probe; see [`conductivity`].

pub mod conductivity;
