//! Phase Clock
//!
//! A monotonic time source. The clock never stops: pausing a session is the
//! state machine declining to advance, not the clock freezing. Everything in
//! the engine reads time through [`Clock`] so tests can drive it by hand.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Current monotonic timestamp
    fn now(&self) -> Instant;

    /// Time elapsed since `last`, never negative
    fn delta_since(&self, last: Instant) -> Duration {
        self.now().saturating_duration_since(last)
    }
}

/// Clock backed by [`Instant::now`]
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic tests and replays
///
/// Starts at the instant it was created and only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
