//! Session
//!
//! One playthrough of a [`TechniquePattern`]. A session only knows how far it
//! has got: phase index, elapsed time inside the phase, and completed cycles.
//! It is advanced by explicit time deltas, so it never reads a clock and can
//! be driven deterministically from tests.
//!
//! Time is kept as [`Duration`] (integer nanoseconds) so repeated ticks never
//! accumulate floating point drift.

use std::time::{Duration, Instant};

use crate::catalog::{PhaseLabel, PhaseSpec, TechniquePattern};

/// A phase boundary passed during [`Session::advance`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryCrossing {
    /// Label of the phase that just ended
    pub from: PhaseLabel,
    /// Label of the phase that just began
    pub to: PhaseLabel,
    /// Index of the phase that just began
    pub to_index: usize,
    /// This crossing wrapped back to the first phase
    pub cycle_completed: bool,
    /// This crossing finished the final cycle
    pub session_completed: bool,
}

/// Result of advancing a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Still going
    Continuing,
    /// The target cycle count was reached during this advance
    Completed,
}

/// A running or paused playthrough of a technique
#[derive(Clone, Debug)]
pub struct Session {
    pattern: &'static TechniquePattern,
    phase_index: usize,
    elapsed_in_phase: Duration,
    completed_cycles: u32,
    target_cycles: u32,
    started_at: Instant,
    active_time: Duration,
    finished: bool,
}

impl Session {
    /// Start a session at phase 0 with no elapsed time
    ///
    /// `target_cycles` of zero is treated as one.
    #[must_use]
    pub fn new(pattern: &'static TechniquePattern, target_cycles: u32, started_at: Instant) -> Self {
        Self {
            pattern,
            phase_index: 0,
            elapsed_in_phase: Duration::ZERO,
            completed_cycles: 0,
            target_cycles: target_cycles.max(1),
            started_at,
            active_time: Duration::ZERO,
            finished: false,
        }
    }

    /// Reset progress to the start of the pattern, keeping pattern and target
    pub fn restart(&mut self, now: Instant) {
        *self = Self::new(self.pattern, self.target_cycles, now);
    }

    /// Advance session time by `dt`
    ///
    /// Every phase boundary passed is appended to `crossings`, including
    /// several in one call and zero-duration phases, which are crossed as soon
    /// as they are entered. Completion clamps elapsed time to zero and stops
    /// further advancement.
    pub fn advance(&mut self, dt: Duration, crossings: &mut Vec<BoundaryCrossing>) -> Advance {
        if self.finished {
            return Advance::Completed;
        }

        self.active_time += dt;
        self.elapsed_in_phase += dt;

        let phases = self.pattern.phases;
        while self.elapsed_in_phase >= phases[self.phase_index].duration {
            let from = phases[self.phase_index].label;
            self.elapsed_in_phase -= phases[self.phase_index].duration;
            self.phase_index += 1;

            let cycle_completed = self.phase_index == phases.len();
            if cycle_completed {
                self.phase_index = 0;
                self.completed_cycles += 1;
            }
            let session_completed = cycle_completed && self.completed_cycles >= self.target_cycles;

            crossings.push(BoundaryCrossing {
                from,
                to: phases[self.phase_index].label,
                to_index: self.phase_index,
                cycle_completed,
                session_completed,
            });

            if session_completed {
                // Time past the final boundary isn't part of the session
                self.active_time -= self.elapsed_in_phase;
                self.elapsed_in_phase = Duration::ZERO;
                self.finished = true;
                tracing::debug!(
                    technique = self.pattern.id,
                    cycles = self.completed_cycles,
                    "Session completed"
                );
                return Advance::Completed;
            }
        }

        Advance::Continuing
    }

    #[must_use]
    pub fn pattern(&self) -> &'static TechniquePattern {
        self.pattern
    }

    #[must_use]
    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    #[must_use]
    pub fn phase(&self) -> &'static PhaseSpec {
        &self.pattern.phases[self.phase_index]
    }

    #[must_use]
    pub fn elapsed_in_phase(&self) -> Duration {
        self.elapsed_in_phase
    }

    #[must_use]
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    #[must_use]
    pub fn target_cycles(&self) -> u32 {
        self.target_cycles
    }

    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Total time the session was advanced by, excluding pauses
    #[must_use]
    pub fn active_time(&self) -> Duration {
        self.active_time
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the current phase that has elapsed, in [0, 1]
    #[must_use]
    pub fn phase_progress(&self) -> f64 {
        let duration = self.phase().duration;
        if duration.is_zero() {
            return 1.0;
        }
        (self.elapsed_in_phase.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Time left in the current phase
    #[must_use]
    pub fn remaining_in_phase(&self) -> Duration {
        self.phase().duration.saturating_sub(self.elapsed_in_phase)
    }

    /// Fraction of the whole session that has elapsed, in [0, 1]
    #[must_use]
    pub fn session_progress(&self) -> f64 {
        if self.finished {
            return 1.0;
        }
        let cycle = self.pattern.cycle_duration();
        let total = cycle * self.target_cycles;
        if total.is_zero() {
            return 0.0;
        }
        let into_cycle: Duration = self.pattern.phases[..self.phase_index]
            .iter()
            .map(|p| p.duration)
            .sum::<Duration>()
            + self.elapsed_in_phase;
        let done = cycle * self.completed_cycles + into_cycle;
        (done.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }
}
