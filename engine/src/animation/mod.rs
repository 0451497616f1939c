//! Animation Curve Engine
//!
//! Turns session progress into the values a renderer draws: a breath
//! amplitude in [0, 1] and a particle snapshot.
//!
//! # Amplitude
//!
//! Inhales ease the amplitude up towards 1, exhales ease it down towards 0,
//! holds keep whatever the previous phase reached. [`AnimationCurve::curve`]
//! uses the canonical start for a label; the [`AnimationEngine`] instead walks
//! the pattern once per technique and eases each phase from where the last
//! one ended, so back-to-back inhales never jump.

pub mod particles;
pub mod timing;

use std::time::Duration;

pub use particles::{Particle, ParticleField, ParticleSnapshot, BURST_SECS, MAX_PARTICLES};
pub use timing::EasingFunction;

use crate::catalog::{PhaseDirection, PhaseLabel, TechniquePattern};
use crate::session::Session;

/// Level reached by a rising phase that is followed by another rising phase
const PARTIAL_FILL: f64 = 0.75;

/// Level reached by a falling phase that is followed by another falling phase
const PARTIAL_EMPTY: f64 = 0.25;

/// Maps (phase, progress) to amplitude
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationCurve {
    easing: EasingFunction,
}

impl AnimationCurve {
    #[must_use]
    pub fn new(easing: EasingFunction) -> Self {
        Self { easing }
    }

    #[must_use]
    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    /// Amplitude for `label` at `progress`, from the label's canonical start
    #[must_use]
    pub fn curve(&self, label: PhaseLabel, progress: f64) -> f64 {
        let start = match label {
            PhaseLabel::Inhale | PhaseLabel::HoldEmpty => 0.0,
            PhaseLabel::Exhale | PhaseLabel::HoldFull => 1.0,
        };
        self.curve_from(label, progress, start)
    }

    /// Amplitude for `label` at `progress`, easing from `start`
    #[must_use]
    pub fn curve_from(&self, label: PhaseLabel, progress: f64, start: f64) -> f64 {
        let end = match label.direction() {
            PhaseDirection::Rising => 1.0,
            PhaseDirection::Steady => start,
            PhaseDirection::Falling => 0.0,
        };
        self.between(start, end, progress)
    }

    /// Ease from `start` to `end`
    #[must_use]
    pub fn between(&self, start: f64, end: f64, progress: f64) -> f64 {
        let t = self.easing.apply(progress);
        (start + (end - start) * t).clamp(0.0, 1.0)
    }
}

/// Start and end amplitude of one phase
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpan {
    pub start: f64,
    pub end: f64,
}

/// Walk `pattern` from an empty breath, recording each phase's span
///
/// A rising phase followed by another rising phase stops short of full so
/// the second one has room to move, and likewise for falling phases.
#[must_use]
pub fn phase_spans(pattern: &TechniquePattern) -> Vec<PhaseSpan> {
    let phases = pattern.phases;
    let mut level = 0.0;
    let mut spans = Vec::with_capacity(phases.len());

    for (i, phase) in phases.iter().enumerate() {
        let next = phases.get(i + 1).map(|p| p.label.direction());
        let end = match (phase.label.direction(), next) {
            (PhaseDirection::Rising, Some(PhaseDirection::Rising)) => PARTIAL_FILL.max(level),
            (PhaseDirection::Rising, _) => 1.0,
            (PhaseDirection::Falling, Some(PhaseDirection::Falling)) => PARTIAL_EMPTY.min(level),
            (PhaseDirection::Falling, _) => 0.0,
            (PhaseDirection::Steady, _) => level,
        };
        spans.push(PhaseSpan { start: level, end });
        level = end;
    }
    spans
}

/// Everything a renderer needs to draw one tick of a session
///
/// Produced fresh every tick; renderers only read it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    /// Breath amplitude in [0, 1]
    pub amplitude: f64,
    pub label: PhaseLabel,
    pub instruction: &'static str,
    pub phase_index: usize,
    /// Fraction of the current phase elapsed
    pub phase_progress: f64,
    /// Time left in the current phase
    pub remaining: Duration,
    /// Fraction of the whole session elapsed
    pub session_progress: f64,
    pub completed_cycles: u32,
    pub target_cycles: u32,
    /// Active (unpaused) session time
    pub active_time: Duration,
    pub particles: ParticleSnapshot,
    /// Completion burst, empty until the session finishes
    pub celebration: ParticleSnapshot,
}

/// Stateful wrapper producing [`AnimationFrame`]s
///
/// Holds the per-technique span table, the animation counter, which only
/// moves while the session is running, and the time since completion.
#[derive(Clone, Debug)]
pub struct AnimationEngine {
    curve: AnimationCurve,
    particles: ParticleField,
    spans: Vec<PhaseSpan>,
    spans_for: Option<&'static str>,
    counter: f64,
    celebration: f64,
}

impl AnimationEngine {
    #[must_use]
    pub fn new(easing: EasingFunction, particle_count: usize) -> Self {
        Self {
            curve: AnimationCurve::new(easing),
            particles: ParticleField::new(particle_count),
            spans: Vec::new(),
            spans_for: None,
            counter: 0.0,
            celebration: 0.0,
        }
    }

    /// Move the animation counter forward by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.counter += dt.as_secs_f64();
    }

    #[must_use]
    pub fn counter(&self) -> f64 {
        self.counter
    }

    /// Move the completion burst forward by `dt`
    pub fn tick_celebration(&mut self, dt: Duration) {
        self.celebration += dt.as_secs_f64();
    }

    /// Rewind the completion burst for a new session
    pub fn reset_celebration(&mut self) {
        self.celebration = 0.0;
    }

    /// Build the frame for the current session state
    pub fn frame(&mut self, session: &Session) -> AnimationFrame {
        let pattern = session.pattern();
        if self.spans_for != Some(pattern.id) {
            self.spans = phase_spans(pattern);
            self.spans_for = Some(pattern.id);
        }

        let index = session.phase_index();
        let phase = session.phase();
        let span = self.spans[index];
        let progress = session.phase_progress();
        let amplitude = if session.is_finished() {
            span.start
        } else {
            self.curve.between(span.start, span.end, progress)
        };

        AnimationFrame {
            amplitude,
            label: phase.label,
            instruction: phase.instruction,
            phase_index: index,
            phase_progress: progress,
            remaining: session.remaining_in_phase(),
            session_progress: session.session_progress(),
            completed_cycles: session.completed_cycles(),
            target_cycles: session.target_cycles(),
            active_time: session.active_time(),
            particles: self.particles.snapshot(amplitude, self.counter),
            celebration: if session.is_finished() {
                self.particles.burst(self.celebration)
            } else {
                ParticleSnapshot::empty()
            },
        }
    }
}
