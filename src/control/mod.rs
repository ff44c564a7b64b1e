//! Control laws. Watering is open-loop: a fixed run time per cycle.

pub mod pump_timing;
