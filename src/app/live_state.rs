//! Published controller state for the reporting side.
//!
//! The controller thread is the only writer; any number of reporting
//! threads read. The three fields live in one immutable [`LiveState`]
//! value behind a single `RwLock` and are replaced wholesale at the end of
//! each tick, so a reader always gets a combination that existed at one
//! completed tick boundary.
//!
//! ```text
//!   controller thread                       status server
//!   ─────────────────                       ─────────────
//!   tick() ──▶ LiveStatePublisher::publish ──▶ [ RwLock<LiveState> ] ──▶ LiveStateReader::read
//! ```
//!
//! Writer and reader are separate types: the publisher is not `Clone`, so
//! only the code that owns it (the controller) can change what readers see.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDateTime;

/// Point-in-time view of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveState {
    /// Conductivity derived from the latest sample (siemens); NaN when the
    /// probe has not produced a usable reading.
    pub latest_conductivity: f32,
    pub last_watering: NaiveDateTime,
    pub next_watering: NaiveDateTime,
}

impl LiveState {
    /// State published before the first tick completes.
    pub fn initial(last_watering: NaiveDateTime, next_watering: NaiveDateTime) -> Self {
        Self {
            latest_conductivity: f32::NAN,
            last_watering,
            next_watering,
        }
    }
}

/// Create the shared slot seeded with `initial`.
pub fn channel(initial: LiveState) -> (LiveStatePublisher, LiveStateReader) {
    let slot = Arc::new(RwLock::new(initial));
    (
        LiveStatePublisher {
            slot: Arc::clone(&slot),
        },
        LiveStateReader { slot },
    )
}

/// Write half, owned by the controller.
#[derive(Debug)]
pub struct LiveStatePublisher {
    slot: Arc<RwLock<LiveState>>,
}

impl LiveStatePublisher {
    /// Replace the published state.
    pub fn publish(&self, state: LiveState) {
        // A poisoned lock still holds a complete value; the writer only
        // ever swaps whole structs.
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = state;
    }

    /// Another read handle onto the same slot.
    pub fn reader(&self) -> LiveStateReader {
        LiveStateReader {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Read half, cheap to clone and hand to any number of threads.
#[derive(Debug, Clone)]
pub struct LiveStateReader {
    slot: Arc<RwLock<LiveState>>,
}

impl LiveStateReader {
    /// Copy of the most recently published state.
    pub fn read(&self) -> LiveState {
        *self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }
}
