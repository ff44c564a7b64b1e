//! System clock adapter.
//!
//! Implements [`ClockPort`] with the local wall clock and
//! `std::thread::sleep`. On ESP-IDF the wall clock is the SNTP-synced
//! system time; before sync it starts at the epoch, which only shifts the
//! schedule anchor.

use core::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::app::ports::ClockPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
