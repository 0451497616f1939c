//! Frame Scheduler
//!
//! The single cooperative control loop. Each tick:
//!
//! 1. poll the input source (never blocks)
//! 2. apply the event to the state machine
//! 3. advance the session by the clamped `dt`
//! 4. build the [`RenderFrame`]
//! 5. dispatch audio cues for the boundaries crossed
//! 6. hand the frame to the renderer
//! 7. sleep for whatever is left of the tick budget
//!
//! An overrunning tick is absorbed by the next tick's `dt` (up to the clamp).
//! The scheduler never runs several logic steps to catch up.

use std::time::{Duration, Instant};

use crate::animation::{AnimationEngine, AnimationFrame};
use crate::audio::CueDispatcher;
use crate::catalog::TechniquePattern;
use crate::clock::Clock;
use crate::config::BreatheConfig;
use crate::error::EngineError;
use crate::input::{InputEvent, InputSource};
use crate::machine::{RunState, SessionMachine};
use crate::session::BoundaryCrossing;

/// Read-only snapshot handed to the renderer each tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderFrame {
    pub state: RunState,
    /// Technique of the active session, or the highlighted menu entry
    pub technique: &'static TechniquePattern,
    /// Highlighted menu index
    pub highlighted: usize,
    /// Cycle count the next session would use
    pub cycles_target: u32,
    /// Present whenever a session exists
    pub animation: Option<AnimationFrame>,
    pub show_help: bool,
    pub audio_enabled: bool,
}

/// Something that can paint a [`RenderFrame`]
pub trait FrameRenderer {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), EngineError>;
}

/// What happened, for the exit summary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub technique: &'static TechniquePattern,
    pub completed_cycles: u32,
    pub target_cycles: u32,
    /// Unpaused time spent in the session
    pub active_time: Duration,
    pub completed: bool,
}

/// Drives the state machine, animation and audio at a fixed cadence
pub struct FrameScheduler<C: Clock> {
    clock: C,
    machine: SessionMachine,
    animation: AnimationEngine,
    audio: CueDispatcher,
    frame_budget: Duration,
    max_dt: Duration,
    last_tick: Instant,
    crossings: Vec<BoundaryCrossing>,
    ticks: u64,
    overruns: u64,
}

impl<C: Clock> FrameScheduler<C> {
    pub fn new(clock: C, machine: SessionMachine, audio: CueDispatcher, config: &BreatheConfig) -> Self {
        let last_tick = clock.now();
        let mut scheduler = Self {
            clock,
            machine,
            animation: AnimationEngine::new(config.easing, config.particle_count),
            audio,
            frame_budget: config.frame_duration(),
            max_dt: config.max_frame_delta,
            last_tick,
            crossings: Vec::with_capacity(8),
            ticks: 0,
            overruns: 0,
        };
        // A session started before the loop gets its start cue on the first tick
        scheduler.audio.set_enabled(scheduler.machine.audio_enabled());
        if scheduler.machine.state() == RunState::Running {
            scheduler.audio.on_session_start();
        }
        scheduler
    }

    /// Run one tick using the clock's elapsed time as `dt`
    pub fn tick(&mut self, input: Option<InputEvent>) -> RenderFrame {
        let now = self.clock.now();
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.step(dt, input)
    }

    /// Run one tick with an explicit `dt`
    ///
    /// `dt` is clamped to the configured maximum. A tick that starts, resumes
    /// or restarts a session contributes no time to it.
    pub fn step(&mut self, dt: Duration, input: Option<InputEvent>) -> RenderFrame {
        let dt = dt.min(self.max_dt);
        let now = self.clock.now();
        let was_running = self.machine.state() == RunState::Running;
        let was_completed = self.machine.state() == RunState::Completed;

        let applied = input.map(|event| self.machine.apply(event, now));
        let started = applied.is_some_and(|a| a.session_started);

        self.audio.set_enabled(self.machine.audio_enabled());
        if started {
            self.audio.on_session_start();
        }

        self.crossings.clear();
        if was_running && !started && self.machine.state() == RunState::Running {
            self.animation.tick(dt);
            self.machine.advance(dt, &mut self.crossings);
        }

        if started {
            self.animation.reset_celebration();
        } else if was_completed && self.machine.state() == RunState::Completed {
            self.animation.tick_celebration(dt);
        }

        let frame = self.build_frame();
        self.dispatch_cues();
        self.ticks += 1;
        frame
    }

    fn build_frame(&mut self) -> RenderFrame {
        let animation = self.machine.session().map(|s| self.animation.frame(s));
        let technique = self
            .machine
            .session()
            .map_or_else(|| self.machine.highlighted_technique(), |s| s.pattern());

        RenderFrame {
            state: self.machine.state(),
            technique,
            highlighted: self.machine.highlighted(),
            cycles_target: self.machine.cycles_target(),
            animation,
            show_help: self.machine.show_help(),
            audio_enabled: self.machine.audio_enabled(),
        }
    }

    fn dispatch_cues(&mut self) {
        for crossing in &self.crossings {
            if crossing.session_completed {
                self.audio.on_session_complete();
            } else {
                self.audio.on_phase_boundary(crossing.from, crossing.to);
            }
        }
    }

    /// Run until the state machine exits
    ///
    /// Returns the summary of the last session, if there was one.
    pub async fn run<I, R>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> Result<Option<SessionSummary>, EngineError>
    where
        I: InputSource,
        R: FrameRenderer,
    {
        tracing::debug!(
            budget_us = self.frame_budget.as_micros() as u64,
            max_dt_ms = self.max_dt.as_millis() as u64,
            "Frame scheduler started"
        );
        self.last_tick = self.clock.now();

        loop {
            let frame_start = self.clock.now();

            let event = input.poll(self.machine.state());
            let frame = self.tick(event);
            if frame.state.is_terminal() {
                break;
            }
            renderer.render(&frame)?;

            // Frame rate limiting
            let elapsed = self.clock.delta_since(frame_start);
            if elapsed < self.frame_budget {
                tokio::time::sleep(self.frame_budget - elapsed).await;
            } else {
                self.overruns += 1;
                tracing::trace!(elapsed_us = elapsed.as_micros() as u64, "Frame overran budget");
            }
        }

        tracing::debug!(ticks = self.ticks, overruns = self.overruns, "Frame scheduler stopped");
        Ok(self.summary())
    }

    /// Summary of the current or last session
    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        self.machine.session().map(|s| SessionSummary {
            technique: s.pattern(),
            completed_cycles: s.completed_cycles(),
            target_cycles: s.target_cycles(),
            active_time: s.active_time(),
            completed: s.is_finished(),
        })
    }

    #[must_use]
    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    #[must_use]
    pub fn audio(&self) -> &CueDispatcher {
        &self.audio
    }

    /// Ticks run so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that took longer than the frame budget
    #[must_use]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}
