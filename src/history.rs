//! Windowed history of probe samples.
//!
//! A fixed-capacity ring that always holds exactly `capacity` values. Slots
//! that have never been written hold the NaN "no data" sentinel, so readers
//! can tell a gap from a real measurement without a separate length field.
//!
//! Pushing overwrites the oldest slot in O(1). Logical order is
//! newest-first: index 0 of a [`snapshot`](HistoryBuffer::snapshot) is the
//! most recent sample.

use crate::error::ConfigError;

/// Value stored in slots that have not received a sample yet.
pub const NO_DATA: f32 = f32::NAN;

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    ring: Vec<f32>,
    /// Slot the next push will overwrite (the current oldest element).
    head: usize,
}

impl HistoryBuffer {
    /// Create a buffer of `capacity` sentinel slots.
    ///
    /// A zero capacity is a configuration error: a window that can never
    /// hold a sample has no useful "latest" value.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ValidationFailed(
                "history_capacity must be > 0",
            ));
        }
        Ok(Self {
            ring: vec![NO_DATA; capacity],
            head: 0,
        })
    }

    /// Insert `value` as the newest element, evicting the oldest.
    pub fn push(&mut self, value: f32) {
        self.ring[self.head] = value;
        self.head = (self.head + 1) % self.ring.len();
    }

    /// Most recent sample, or [`NO_DATA`] before the first push.
    pub fn latest(&self) -> f32 {
        let len = self.ring.len();
        self.ring[(self.head + len - 1) % len]
    }

    /// Owned copy of the window, newest first. Always `capacity` long.
    pub fn snapshot(&self) -> Vec<f32> {
        self.iter_newest_first().collect()
    }

    /// Iterate newest to oldest without copying.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let len = self.ring.len();
        (1..=len).map(move |i| self.ring[(self.head + len - i) % len])
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }
}
