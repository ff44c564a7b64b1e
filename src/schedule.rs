//! Daily watering schedule.
//!
//! The schedule fires once per day at a fixed local `hour:minute`. Each
//! time the controller waters, the next due time moves to the same
//! `hour:minute` on the day after the watering, so a late tick never causes
//! a second run for the same due time and never skips more than one day.
//!
//! ```text
//!   last_watering ──(+1 day, at hh:mm)──▶ next_watering
//!        ▲                                     │
//!        └────── record_watering(now) ◀── now >= next_watering
//! ```
//!
//! Timestamps are naive local wall-clock times. The schedule is pure data;
//! the controller supplies `now` from its [`ClockPort`](crate::app::ports::ClockPort).

use chrono::{NaiveDateTime, NaiveTime};
use log::info;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WateringSchedule {
    time_of_day: NaiveTime,
    last_watering: NaiveDateTime,
    next_watering: NaiveDateTime,
}

impl WateringSchedule {
    /// Build a schedule anchored at `now` (usually boot time).
    ///
    /// Without an override the first watering is the first `hour:minute`
    /// strictly after `now`. With `first_watering` the initial due time is
    /// taken verbatim; it does not have to fall on `hour:minute`.
    pub fn new(
        hour: u8,
        minute: u8,
        now: NaiveDateTime,
        first_watering: Option<NaiveDateTime>,
    ) -> Result<Self, ConfigError> {
        let time_of_day = NaiveTime::from_hms_opt(u32::from(hour), u32::from(minute), 0)
            .ok_or(ConfigError::ValidationFailed(
                "watering time must be a valid hour:minute",
            ))?;
        let next_watering =
            first_watering.unwrap_or_else(|| next_occurrence_after(now, time_of_day));
        info!(
            "Schedule: daily at {}, first watering {}",
            time_of_day.format("%H:%M"),
            next_watering
        );
        Ok(Self {
            time_of_day,
            last_watering: now,
            next_watering,
        })
    }

    /// Due when `now` has reached or passed the next watering time.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_watering
    }

    /// Record a completed watering at `at` and move the due time to
    /// `hour:minute` on the following day.
    pub fn record_watering(&mut self, at: NaiveDateTime) {
        self.last_watering = at;
        self.next_watering = following_day_at(at, self.time_of_day);
    }

    pub fn last_watering(&self) -> NaiveDateTime {
        self.last_watering
    }

    pub fn next_watering(&self) -> NaiveDateTime {
        self.next_watering
    }

    pub fn time_of_day(&self) -> NaiveTime {
        self.time_of_day
    }
}

/// First `time_of_day` strictly after `t`.
pub fn next_occurrence_after(t: NaiveDateTime, time_of_day: NaiveTime) -> NaiveDateTime {
    let today = t.date().and_time(time_of_day);
    if today > t {
        today
    } else {
        following_day_at(t, time_of_day)
    }
}

/// `time_of_day` on the calendar day after `t`.
pub fn following_day_at(t: NaiveDateTime, time_of_day: NaiveTime) -> NaiveDateTime {
    t.date()
        .succ_opt()
        .map_or(NaiveDateTime::MAX, |day| day.and_time(time_of_day))
}
